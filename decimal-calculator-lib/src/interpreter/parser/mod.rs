mod call;

use crate::config::Config;
use crate::error::{EvaluationError, Result};
use crate::interpreter::lexer::split_at_decimal_comma;
use crate::interpreter::operator::{BinaryOperator, UnaryOperator};
use crate::interpreter::registry::{find_constant, find_function};
use crate::interpreter::syntax::program::{Instruction, Program};
use crate::interpreter::token::{Token, TokenKind};
use std::collections::VecDeque;

/// Parses the given tokens into an equivalent postfix program,
/// which can be evaluated without recursion.
///
/// # Arguments
///
/// * `tokens`: The tokens to parse, in infix format.
/// * `config`: Limits that apply while parsing.
///
/// returns: The equivalent program.
///
/// # Examples
///
/// ```
/// use decimal_calculator::interpreter::lexer::tokenize;
/// use decimal_calculator::interpreter::parser::parse;
/// use decimal_calculator::Config;
///
/// let tokens = tokenize("hypot(3,4) * 2").unwrap();
/// let program = parse(tokens, &Config::default()).unwrap();
/// assert_eq!(program.postfix(), "3 4 hypot/2 2 *");
/// ```
pub fn parse(tokens: Vec<Token>, config: &Config) -> Result<Program> {
    let mut parser = Parser::new(tokens, config);

    parser.parse_expression(0)?;
    let expression = std::mem::take(&mut parser.output);

    let comparison = match parser.tokens.front().map(|token| &token.kind) {
        Some(TokenKind::Comparison(operator)) => {
            let operator = *operator;
            parser.tokens.pop_front();
            parser.parse_expression(0)?;
            Some((operator, std::mem::take(&mut parser.output)))
        }
        _ => None,
    };

    match parser.tokens.pop_front() {
        Some(token) => Err(unexpected(&token)),
        None => Ok(Program {
            expression,
            comparison,
        }),
    }
}

/// Precedence-climbing parser that writes postfix instructions as it goes.
struct Parser<'a> {
    tokens: VecDeque<Token>,
    output: Vec<Instruction>,
    config: &'a Config,
    depth: usize,
    /// Set while parsing the first argument of a function that takes two, where
    /// `3,4` means the arguments `3` and `4` rather than the number `3.4`.
    split_decimal_commas: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, config: &'a Config) -> Parser<'a> {
        Parser {
            tokens: VecDeque::from(tokens),
            output: vec![],
            config,
            depth: 0,
            split_decimal_commas: false,
        }
    }

    /// Parses operands joined by operators of at least `min_precedence`.
    fn parse_expression(&mut self, min_precedence: u8) -> Result<()> {
        self.parse_unary()?;

        while let Some(token) = self.tokens.front() {
            if let Some(operator) = UnaryOperator::postfix(&token.kind) {
                if operator.precedence() < min_precedence {
                    break;
                }
                self.tokens.pop_front();
                self.output.push(Instruction::Unary(operator));
            } else if let Some(operator) = BinaryOperator::from_token(&token.kind) {
                if operator.precedence() < min_precedence {
                    break;
                }
                self.tokens.pop_front();
                // Every binary operator is left-associative, `**` included.
                self.parse_expression(operator.precedence() + 1)?;
                self.output.push(Instruction::Binary(operator));
            } else {
                break;
            }
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<()> {
        let prefix = self
            .tokens
            .front()
            .and_then(|token| UnaryOperator::prefix(&token.kind).map(|operator| (operator, token.position)));

        match prefix {
            Some((operator, position)) => {
                self.tokens.pop_front();
                self.nested(position, |parser| parser.parse_unary())?;
                self.output.push(Instruction::Unary(operator));
                Ok(())
            }
            None => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<()> {
        let token = self
            .tokens
            .pop_front()
            .ok_or(EvaluationError::UnexpectedEnd)?;

        match token.kind {
            TokenKind::Literal(_) => self.push_literal(token),
            TokenKind::Identifier(ref name) => self.parse_identifier(name, token.position),
            TokenKind::LeftParentheses => self.parse_group(token.position),
            _ => Err(unexpected(&token)),
        }
    }

    fn parse_group(&mut self, position: usize) -> Result<()> {
        self.nested(position, |parser| {
            parser.splitting_decimal_commas(false, |parser| parser.parse_expression(0))?;
            parser.expect(TokenKind::RightParentheses)?;
            Ok(())
        })
    }

    fn push_literal(&mut self, token: Token) -> Result<()> {
        if self.split_decimal_commas && !token.lexeme.starts_with(',') {
            if let Some(pieces) = split_at_decimal_comma(&token)? {
                let mut pieces = pieces.into_iter();
                let first = pieces.next();
                for piece in pieces.rev() {
                    self.tokens.push_front(piece);
                }
                return match first {
                    Some(first) => self.push_literal_value(first),
                    None => Err(unexpected(&token)),
                };
            }
        }
        self.push_literal_value(token)
    }

    fn push_literal_value(&mut self, token: Token) -> Result<()> {
        match token.kind {
            TokenKind::Literal(value) => {
                self.output.push(Instruction::Push(value));
                Ok(())
            }
            _ => Err(unexpected(&token)),
        }
    }

    /// Resolves a name: constants are values, functions are calls, anything else is
    /// unknown.
    fn parse_identifier(&mut self, name: &str, position: usize) -> Result<()> {
        if let Some(constant) = find_constant(name) {
            self.output.push(Instruction::Push(constant.value()));
            return Ok(());
        }

        let next = self.tokens.front();
        let opens_group = matches!(next, Some(token) if token.kind == TokenKind::LeftParentheses);
        let starts_argument = next.map_or(false, Token::starts_expression);

        match find_function(name) {
            Some(function) if opens_group => self.parse_parenthesized_call(function),
            Some(function) if starts_argument => self.parse_bare_call(function, position),
            None if starts_argument => Err(EvaluationError::UnknownFunction(name.to_string())),
            _ => Err(EvaluationError::UnknownValue(name.to_string())),
        }
    }

    /// Runs `parse` one nesting level deeper, failing once the configured depth is
    /// exceeded.
    fn nested(&mut self, position: usize, parse: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(EvaluationError::NestingTooDeep {
                limit: self.config.max_depth,
                position,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn splitting_decimal_commas(
        &mut self,
        enabled: bool,
        parse: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let previous = std::mem::replace(&mut self.split_decimal_commas, enabled);
        let result = parse(self);
        self.split_decimal_commas = previous;
        result
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        match self.tokens.pop_front() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(unexpected(&token)),
            None => Err(EvaluationError::UnexpectedEnd),
        }
    }
}

fn unexpected(token: &Token) -> EvaluationError {
    EvaluationError::UnexpectedToken {
        lexeme: token.lexeme.clone(),
        position: token.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::interpreter::lexer::tokenize;
    use crate::interpreter::operator::ComparisonOperator;
    use parameterized_macro::parameterized;

    fn compile(expression: &str) -> Result<Program> {
        parse(tokenize(expression)?, &Config::default())
    }

    fn push(text: &str) -> Instruction {
        Instruction::Push(text.parse().unwrap())
    }

    fn binary(operator: BinaryOperator) -> Instruction {
        Instruction::Binary(operator)
    }

    fn call(name: &str, arguments: usize) -> Instruction {
        Instruction::Call {
            function: find_function(name).unwrap(),
            arguments,
        }
    }

    #[test]
    fn infix_to_postfix_simple_expression() {
        // 2 + 3
        let postfix = vec![push("2"), push("3"), binary(BinaryOperator::Add)];

        let actual = compile("2 + 3").unwrap();

        assert_eq!(actual.expression, postfix);
        assert_eq!(actual.comparison, None);
    }

    #[test]
    fn infix_to_postfix_simple_parenthesised_expression() {
        // 7 - (2 + 3)
        let postfix = vec![
            push("7"),
            push("2"),
            push("3"),
            binary(BinaryOperator::Add),
            binary(BinaryOperator::Subtract),
        ];

        let actual = compile("7 - (2 + 3)").unwrap();

        assert_eq!(actual.expression, postfix);
    }

    #[test]
    fn infix_to_postfix_complex_expression() {
        // 1 + 2 * 3 / (4 - 5) ** 6 ** 7
        let postfix = vec![
            push("1"),
            push("2"),
            push("3"),
            binary(BinaryOperator::Multiply),
            push("4"),
            push("5"),
            binary(BinaryOperator::Subtract),
            push("6"),
            binary(BinaryOperator::Exponentiate),
            push("7"),
            binary(BinaryOperator::Exponentiate),
            binary(BinaryOperator::Divide),
            binary(BinaryOperator::Add),
        ];

        let actual = compile("1 + 2 * 3 / (4 - 5) ** 6 ** 7").unwrap();

        assert_eq!(actual.expression, postfix);
    }

    #[test]
    fn sign_binds_tighter_than_power() {
        // -3 ** 2
        let postfix = vec![
            push("3"),
            Instruction::Unary(UnaryOperator::Negate),
            push("2"),
            binary(BinaryOperator::Exponentiate),
        ];

        assert_eq!(compile("-3 ** 2").unwrap().expression, postfix);
    }

    #[test]
    fn factorial_applies_to_the_signed_operand() {
        // -5!
        let postfix = vec![
            push("5"),
            Instruction::Unary(UnaryOperator::Negate),
            Instruction::Unary(UnaryOperator::Factorial),
        ];

        assert_eq!(compile("-5!").unwrap().expression, postfix);
    }

    #[test]
    fn comparison_splits_the_program() {
        let actual = compile("4 + 2 < 6").unwrap();

        assert_eq!(
            actual.expression,
            vec![push("4"), push("2"), binary(BinaryOperator::Add)]
        );
        assert_eq!(
            actual.comparison,
            Some((ComparisonOperator::Less, vec![push("6")]))
        );
    }

    #[parameterized(
        expression = { "2 ** 3 ** 2", "8 / 4 / 2", "7 - 2 - 1", "3! ** 2" },
        expected = { "2 3 ** 2 **", "8 4 / 2 /", "7 2 - 1 -", "3 ! 2 **" }
    )]
    fn binary_operators_group_to_the_left(expression: &str, expected: &str) {
        assert_eq!(compile(expression).unwrap().postfix(), expected);
    }

    #[parameterized(
        expression = { "hypot(3,4)", "hypot(3, 4)", "hypot(3 ,4)", "hypot(3 4)", "hypot 3 4", "hypot 3, 4", "hypot 3,4" },
        expected = { "3 4 hypot/2", "3 4 hypot/2", "3 4 hypot/2", "3 4 hypot/2", "3 4 hypot/2", "3 4 hypot/2", "3 4 hypot/2" }
    )]
    fn two_argument_call_forms_are_equivalent(expression: &str, expected: &str) {
        assert_eq!(compile(expression).unwrap().postfix(), expected);
    }

    #[parameterized(
        expression = { "2,3", "sqrt(2,25)", "hypot((3,5) 4)", "hypot(3, 4,5)", "sqrt 4 * 4", "sqrt(4) + 1", "log 100", "(pow 2, 3) * 5" },
        expected = { "2.3", "2.25 sqrt/1", "3.5 4 hypot/2", "3 4.5 hypot/2", "4 4 * sqrt/1", "4 sqrt/1 1 +", "100 log/1", "2 3 pow/2 5 *" }
    )]
    fn decimal_commas_are_only_split_between_arguments(expression: &str, expected: &str) {
        assert_eq!(compile(expression).unwrap().postfix(), expected);
    }

    #[test]
    fn constants_are_values_not_calls() {
        assert_eq!(compile("e - 1").unwrap().postfix(), "2.718281828459045235360287471 1 -");
    }

    #[parameterized(
        expression = { "1 < 2 < 3", "1 < 2 == 3", "2 + (5 < 6)", "2 +", "(2 + 3", "2 3", "sqrt()", ")", "2 * * 3" },
        expected_kind = { ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax }
    )]
    fn malformed_expressions_are_syntax_errors(expression: &str, expected_kind: ErrorKind) {
        assert_eq!(compile(expression).unwrap_err().kind(), expected_kind);
    }

    #[test]
    fn syntax_error_names_the_offending_token() {
        assert_eq!(
            compile("1 < 2 < 3").unwrap_err(),
            EvaluationError::UnexpectedToken {
                lexeme: "<".to_string(),
                position: 6,
            }
        );
        assert_eq!(compile("2 +").unwrap_err(), EvaluationError::UnexpectedEnd);
    }

    #[parameterized(
        expression = { "foo(1)", "foo 1", "foo", "sqrt", "2 * bar" },
        expected = {
            EvaluationError::UnknownFunction("foo".to_string()),
            EvaluationError::UnknownFunction("foo".to_string()),
            EvaluationError::UnknownValue("foo".to_string()),
            EvaluationError::UnknownValue("sqrt".to_string()),
            EvaluationError::UnknownValue("bar".to_string())
        }
    )]
    fn unknown_names_are_reported(expression: &str, expected: EvaluationError) {
        assert_eq!(compile(expression).unwrap_err(), expected);
    }

    #[parameterized(
        expression = { "hypot(3)", "sqrt(4, 5)", "sqrt(4 5)", "hypot 3" },
        given = { 1, 2, 2, 1 }
    )]
    fn argument_count_is_checked(expression: &str, given: usize) {
        let error = compile(expression).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Arity);
        assert!(error.to_string().contains(&format!("but {} were given", given)));
    }

    #[test]
    fn bare_call_takes_a_single_argument_when_function_takes_one() {
        // sqrt 4 5 reads as sqrt(4) followed by a stray 5
        assert_eq!(
            compile("sqrt 4 5").unwrap_err(),
            EvaluationError::UnexpectedToken {
                lexeme: "5".to_string(),
                position: 7,
            }
        );
    }

    #[test]
    fn nesting_within_the_limit_is_accepted() {
        let config = Config { max_depth: 3 };
        let tokens = tokenize("((-1))").unwrap();

        assert!(parse(tokens, &config).is_ok());
    }

    #[parameterized(
        expression = { "((((1))))", "----1", "sqrt(sqrt(sqrt(sqrt(1))))" },
        position = { 3, 3, 19 }
    )]
    fn nesting_beyond_the_limit_is_rejected(expression: &str, position: usize) {
        let config = Config { max_depth: 3 };
        let tokens = tokenize(expression).unwrap();

        assert_eq!(
            parse(tokens, &config).unwrap_err(),
            EvaluationError::NestingTooDeep { limit: 3, position }
        );
    }

    #[test]
    fn long_operator_chains_do_not_nest() {
        let expression = vec!["1"; 10_000].join(" + ");

        let program = compile(&expression).unwrap();

        assert_eq!(program.expression.len(), 19_999);
    }
}
