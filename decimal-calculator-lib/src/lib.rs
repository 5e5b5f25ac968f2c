pub mod config;
pub mod error;
pub mod interpreter;

pub use config::Config;
pub use error::{ErrorKind, EvaluationError};
pub use interpreter::number::Number;
pub use interpreter::value::Value;
pub use interpreter::{compile, evaluate, evaluate_with};
