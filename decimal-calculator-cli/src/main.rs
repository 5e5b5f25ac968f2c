use anyhow::Context;
use clap::Parser;
use decimal_calculator::config::DEFAULT_MAX_DEPTH;
use decimal_calculator::{evaluate_with, Config};
use log::info;

/// Evaluates the given arithmetic expression with 28 significant decimal digits
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(trailing_var_arg = true, allow_negative_numbers = true)]
struct Arguments {
    /// The expression to evaluate; separate words are joined with spaces.
    /// Options go before it, and `--` ends them when the expression starts with `-`
    #[clap(required = true)]
    expression: Vec<String>,

    /// How deeply groups, call arguments and signs may nest
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    let expression = args.expression.join(" ");
    let config = Config {
        max_depth: args.max_depth,
    };
    info!("evaluating {:?}", expression);

    let value = evaluate_with(&expression, &config)
        .with_context(|| format!("Failed to evaluate {:?}", expression))?;
    println!("{}", value);
    Ok(())
}
