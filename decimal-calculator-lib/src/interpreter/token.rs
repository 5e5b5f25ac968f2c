use crate::interpreter::number::Number;
use crate::interpreter::operator::ComparisonOperator;
use std::fmt;
use std::fmt::Formatter;

/// A discrete part of an expression, together with the text it was read from.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact text of the token in the normalized input.
    pub lexeme: String,
    /// Byte offset of the token in the normalized input.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Literal(Number),
    Identifier(String),
    Plus,
    Dash,
    Asterisk,
    DoubleAsterisk,
    ForwardSlash,
    Exclamation,
    LeftParentheses,
    RightParentheses,
    Comma,
    Comparison(ComparisonOperator),
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: usize) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// Whether an expression can begin with this token, i.e. whether it can start a
    /// call argument.
    pub fn starts_expression(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Literal(_)
                | TokenKind::Identifier(_)
                | TokenKind::LeftParentheses
                | TokenKind::Plus
                | TokenKind::Dash
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.lexeme, self.position)
    }
}
