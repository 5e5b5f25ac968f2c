pub mod context;
pub mod evaluator;
pub mod lexer;
pub mod number;
pub mod operator;
pub mod parser;
pub mod registry;
pub mod syntax;
pub mod token;
pub mod value;

use crate::config::Config;
use crate::error::Result;
use crate::interpreter::context::Context;
use crate::interpreter::syntax::program::Program;
use crate::interpreter::value::Value;
use itertools::Itertools;
use log::{debug, trace};

/// Calculates the value of the given expression.
///
/// # Arguments
///
/// * `expression`: A text expression in infix format. Case and surrounding
///   whitespace are ignored.
///
/// returns: The number the expression evaluates to, or a boolean if it is a comparison.
///
/// # Examples
///
/// ```
/// use decimal_calculator::evaluate;
///
/// let value = evaluate("2 + 3 * 5").unwrap();
/// assert_eq!(value.to_string(), "17");
///
/// let comparison = evaluate("hypot(3,4) == 5").unwrap();
/// assert_eq!(comparison.as_boolean(), Some(true));
/// ```
pub fn evaluate(expression: &str) -> Result<Value> {
    evaluate_with(expression, &Config::default())
}

/// Calculates the value of the given expression under an explicit configuration.
///
/// # Arguments
///
/// * `expression`: A text expression in infix format.
/// * `config`: Limits that apply to this evaluation.
///
/// returns: The value of the expression.
///
/// # Examples
///
/// ```
/// use decimal_calculator::{evaluate_with, Config, ErrorKind};
///
/// let config = Config { max_depth: 2 };
/// let error = evaluate_with("((((1))))", &config).unwrap_err();
/// assert_eq!(error.kind(), ErrorKind::NestingTooDeep);
/// ```
pub fn evaluate_with(expression: &str, config: &Config) -> Result<Value> {
    let program = compile(expression, config)?;
    evaluator::run(&program, &Context::default())
}

/// Converts the given expression into an equivalent postfix program,
/// which is cheaper to inspect and to run than the source text.
///
/// # Arguments
///
/// * `expression`: The text-representation of the infix expression.
/// * `config`: Limits that apply while parsing.
///
/// returns: The equivalent program.
///
/// # Examples
///
/// ```
/// use decimal_calculator::{compile, Config};
///
/// let program = compile("SQRT 16 + 9", &Config::default()).unwrap();
/// assert_eq!(program.postfix(), "16 9 + sqrt/1");
/// ```
pub fn compile(expression: &str, config: &Config) -> Result<Program> {
    let normalized = expression.trim().to_lowercase();
    let tokens = lexer::tokenize(&normalized)?;
    trace!("tokens: {}", tokens.iter().join(" "));
    let program = parser::parse(tokens, config)?;
    debug!("{:?} compiles to\n{}", normalized, program);
    Ok(program)
}

#[cfg(test)]
mod interpreter_tests {
    use super::*;
    use crate::error::ErrorKind;
    use parameterized_macro::parameterized;

    fn check(expression: &str, expected: &str) {
        let actual = evaluate(expression).unwrap();
        assert_eq!(actual.to_string(), expected, "evaluating {:?}", expression);
    }

    fn check_error(expression: &str, expected_kind: ErrorKind) {
        let error = evaluate(expression).unwrap_err();
        assert_eq!(error.kind(), expected_kind, "evaluating {:?}", expression);
    }

    #[parameterized(
        expression = { "2 + 3", "0 + 5", "+2", "2 + +2", "2 - 1", "4-3", "3 -7", "-7", "2 - -2" },
        expected = { "5", "5", "2", "4", "1", "1", "-4", "-7", "4" }
    )]
    fn sums_and_differences(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "2 * 5", "-3 * 2", "3 * -2", "0 * 81256894562934562834652834562345", "239846298462483 * 2429784263942", "-7 * -2" },
        expected = { "10", "-6", "-6", "0", "582774761768877502456687986", "14" }
    )]
    fn products(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "7 / 2", "8 / 4", "2 / 17", "2 / 124124124124", "1 / 3" },
        expected = { "3.5", "2", "0.1176470588235294117647058824", "1.611290322582256451612904837e-11", "0.3333333333333333333333333333" }
    )]
    fn quotients(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "2 ** 3", "0 ** 2", "13513515135153135 ** 0", "-3 ** 2", "-3 ** 3", "10 ** -1", "2 ** -2", "2 ** 3 ** 2", "2 ** 1500", "144 ** 0.5", "2 ** 0.5" },
        expected = { "8", "0", "1", "9", "-27", "0.1", "0.25", "64", "3.507466211043403874762758796e+451", "12", "1.414213562373095048801688724" }
    )]
    fn powers(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "2 + 0.3", "2.3 - 1.1", "3.3 ** 0", "12 / 4.0", "0.1 + 0.2" },
        expected = { "2.3", "1.2", "1", "3", "0.3" }
    )]
    fn fractional_operands(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "2 + .5", "2 + 0,3", "2 + ,3", "1e2", "1e+2", "1e-2", "1E2", "1E+2", "1E-2", "2,", "2,e3", "2.", "2.e3", "2,3" },
        expected = { "2.5", "2.3", "2.3", "100", "100", "0.01", "100", "100", "0.01", "2", "2000", "2", "2000", "2.3" }
    )]
    fn alternate_number_formats(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "(2 + 3)", "3 - (2)", "3 - (-2)", "(2 + 3) * 3", "2 + (3 * 5)", "2 + 3 * 5", "((2 + 3) * 2) ** (1 + 0)" },
        expected = { "5", "1", "5", "15", "17", "17", "10" }
    )]
    fn grouping(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "0!", "1!", "3!", "3!!", "100! / 99!" },
        expected = { "1", "1", "6", "720", "100" }
    )]
    fn factorials(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = {
            "acos(1)", "round(acosh(2), 11)", "asin(0)", "round(asinh(4), 11)", "round(atan(5), 11)",
            "ceil(6.1)", "round(cos(8), 12)", "round(cosh(9), 8)", "round(degrees(10), 9)",
            "round(exp(13), 6)", "factorial(16)", "floor(1.7)", "gamma(6)", "round(radians(32), 12)",
            "round(sin(33), 12)", "round(sinh(34), -3)", "round(sqrt(35), 10)", "round(tan(36), 10)",
            "tanh(37)", "trunc(38)", "hypot(4, 3)", "hypot(4 3)", "pow(2, 3)"
        },
        expected = {
            "0", "1.31695789692", "0", "2.09471254726", "1.37340076695",
            "7", "-0.145500033809", "4051.54202549", "572.957795131",
            "442413.392009", "20922789888000", "1", "120", "0.558505360638",
            "0.999911860107", "291730871264000", "5.9160797831", "7.7504709057",
            "1", "38", "5", "5", "8"
        }
    )]
    fn functions_with_parentheses(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = {
            "acos 1", "round(acosh 2, 11)", "asin 0", "round(asinh 4, 11)", "round(atan 5, 11)",
            "ceil 6.1", "round(cos 8, 12)", "round(cosh 9, 8)", "round(degrees 10, 9)",
            "round(exp 13, 6)", "factorial 16", "floor 1.7", "gamma 6", "round(radians 32, 12)",
            "round(sin 33, 12)", "round((sinh 34), -3)", "round(sqrt 35, 10)", "round(tan 36, 10)",
            "tanh 37", "trunc 38", "hypot 4, 3", "hypot 4 3", "pow 2, 3", "(pow 2, 3) * 5"
        },
        expected = {
            "0", "1.31695789692", "0", "2.09471254726", "1.37340076695",
            "7", "-0.145500033809", "4051.54202549", "572.957795131",
            "442413.392009", "20922789888000", "1", "120", "0.558505360638",
            "0.999911860107", "291730871264000", "5.9160797831", "7.7504709057",
            "1", "38", "5", "5", "8", "40"
        }
    )]
    fn functions_without_parentheses(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "log(10)", "ln(2.718281828459045)", "log2(64)", "log(64, 2)", "distance(4, 3)", "log10(1000)", "log 1000" },
        expected = { "1", "1", "6", "6", "5", "3", "3" }
    )]
    fn logarithms_and_distances(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "int(2.3)", "int(44, 5)", "round(12.1234, 2)", "abs(-55)", "round(2.5)", "int(-2.7)" },
        expected = { "2", "24", "12.12", "55", "2", "-2" }
    )]
    fn conversions(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "round(e, 11)", "round(pi, 11)", "sin(pi / 2)", "ln(e)", "e - 1", "2 * pi" },
        expected = { "2.71828182846", "3.14159265359", "1", "1", "1.718281828459045235360287471", "6.283185307179586476925286766" }
    )]
    fn named_values(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = {
            "2 < 1", "2 < 3", "4 + 2 < 6", "7 > -8", "7 > 8", "0 > 0", "2 <= 3", "2 <= 2",
            "2 <= 1", "2 >= 1", "2 >= 2", "2 >= 3", "2 == 2", "2 == 1", "-2 == 2", "2 = 2",
            "2 === 2", "2 != 1", "2 != 2", "2 != 3", "2 <> 2", "0.1 + 0.2 == 0.3"
        },
        expected = {
            "False", "True", "False", "True", "False", "False", "True", "True",
            "False", "True", "True", "False", "True", "False", "False", "True",
            "True", "True", "False", "True", "False", "True"
        }
    )]
    fn comparisons(expression: &str, expected: &str) {
        check(expression, expected);
    }

    #[parameterized(
        expression = { "1e2.3", "2 $ 3", "2 + (5 < 6)", "1 < 2 < 3", "1 < 2 > 3", "1 < 2 == 3", "2 +", "" },
        expected_kind = { ErrorKind::Lex, ErrorKind::Lex, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax }
    )]
    fn malformed_input_fails(expression: &str, expected_kind: ErrorKind) {
        check_error(expression, expected_kind);
    }

    #[parameterized(
        expression = { "2.3!", "-5!", "1 / 0", "0 ** 0", "0 ** -1", "(-8) ** 0.5", "sqrt(-1)", "asin(2)", "ln(0)", "gamma(0)" },
        expected_kind = { ErrorKind::Domain, ErrorKind::Domain, ErrorKind::Domain, ErrorKind::Domain, ErrorKind::Domain, ErrorKind::Domain, ErrorKind::Domain, ErrorKind::Domain, ErrorKind::Domain, ErrorKind::Domain }
    )]
    fn domain_errors(expression: &str, expected_kind: ErrorKind) {
        check_error(expression, expected_kind);
    }

    #[parameterized(
        expression = { "101!", "factorial(101)", "10 ** 1000000", "exp(1e7)", "1e1000000", "sinh(1000)" },
        expected_kind = { ErrorKind::Overflow, ErrorKind::Overflow, ErrorKind::Overflow, ErrorKind::Overflow, ErrorKind::Overflow, ErrorKind::Overflow }
    )]
    fn overflow_errors(expression: &str, expected_kind: ErrorKind) {
        check_error(expression, expected_kind);
    }

    #[parameterized(
        expression = { "foo(1)", "foo", "float(123)", "sqrt", "hypot(3)", "sqrt(4, 5)" },
        expected_kind = { ErrorKind::UnknownIdentifier, ErrorKind::UnknownIdentifier, ErrorKind::UnknownIdentifier, ErrorKind::UnknownIdentifier, ErrorKind::Arity, ErrorKind::Arity }
    )]
    fn unknown_names_and_wrong_argument_counts(expression: &str, expected_kind: ErrorKind) {
        check_error(expression, expected_kind);
    }

    #[test]
    fn comma_separated_arguments_match_space_separated_ones() {
        let expected = evaluate("hypot 3 4").unwrap();

        assert_eq!(evaluate("hypot(3,4)").unwrap(), expected);
        assert_eq!(evaluate("hypot(3, 4)").unwrap(), expected);
        assert_eq!(evaluate("hypot 3, 4").unwrap(), expected);
    }

    #[test]
    fn input_is_normalized() {
        assert_eq!(evaluate("  SQRT(16) + PI * 0 \t").unwrap(), evaluate("4").unwrap());
    }

    #[test]
    fn repeated_evaluation_is_idempotent() {
        let first = evaluate("exp(1) ** 2 / 3").unwrap();
        let second = evaluate("exp(1) ** 2 / 3").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn deep_nesting_is_rejected_instead_of_overflowing_the_stack() {
        let expression = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));

        check_error(&expression, ErrorKind::NestingTooDeep);
    }

    #[test]
    fn long_chains_evaluate_iteratively() {
        let expression = vec!["1"; 5_000].join(" + ");

        check(&expression, "5000");
    }
}
