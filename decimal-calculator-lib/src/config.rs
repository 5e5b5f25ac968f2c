/// The default limit on how deeply groups, call arguments and signs may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Settings that apply to a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Parenthesized groups, call argument lists and prefix signs each nest one
    /// level deeper; past this limit evaluation fails instead of recursing further.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
