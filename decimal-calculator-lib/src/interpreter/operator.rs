use crate::error::Result;
use crate::interpreter::context::Context;
use crate::interpreter::number::Number;
use crate::interpreter::token::TokenKind;
use std::fmt;
use std::fmt::Formatter;

/// A binary mathematical operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponentiate,
}

/// An unary mathematical operator: a prefix sign or the postfix factorial.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Identity,
    Negate,
    Factorial,
}

/// A relational operator; only allowed once, at the top of an expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    Equal,
    NotEqual,
}


impl UnaryOperator {
    /// The sign operator a token stands for when it begins an operand.
    pub fn prefix(kind: &TokenKind) -> Option<UnaryOperator> {
        match kind {
            TokenKind::Plus => Some(UnaryOperator::Identity),
            TokenKind::Dash => Some(UnaryOperator::Negate),
            _ => None,
        }
    }

    /// The operator a token stands for when it follows an operand.
    pub fn postfix(kind: &TokenKind) -> Option<UnaryOperator> {
        match kind {
            TokenKind::Exclamation => Some(UnaryOperator::Factorial),
            _ => None,
        }
    }

    /// Signs bind tighter than anything else; factorial shares a tier with `**`.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            UnaryOperator::Identity | UnaryOperator::Negate => 3,
            UnaryOperator::Factorial => 2,
        }
    }

    pub fn evaluate(&self, operand: &Number, context: &Context) -> Result<Number> {
        match self {
            UnaryOperator::Identity => context.round(operand.clone()),
            UnaryOperator::Negate => context.round(-operand),
            UnaryOperator::Factorial => context.factorial(operand),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Identity => "+",
            UnaryOperator::Negate => "-",
            UnaryOperator::Factorial => "!",
        }
    }
}

impl BinaryOperator {
    pub fn from_token(kind: &TokenKind) -> Option<BinaryOperator> {
        match kind {
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Dash => Some(BinaryOperator::Subtract),
            TokenKind::Asterisk => Some(BinaryOperator::Multiply),
            TokenKind::ForwardSlash => Some(BinaryOperator::Divide),
            TokenKind::DoubleAsterisk => Some(BinaryOperator::Exponentiate),
            _ => None,
        }
    }

    pub(crate) fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 0,
            BinaryOperator::Multiply | BinaryOperator::Divide => 1,
            BinaryOperator::Exponentiate => 2,
        }
    }

    pub fn evaluate(&self, left: &Number, right: &Number, context: &Context) -> Result<Number> {
        match self {
            BinaryOperator::Add => context.add(left, right),
            BinaryOperator::Subtract => context.subtract(left, right),
            BinaryOperator::Multiply => context.multiply(left, right),
            BinaryOperator::Divide => context.divide(left, right),
            BinaryOperator::Exponentiate => context.power(left, right),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Exponentiate => "**",
        }
    }
}

impl ComparisonOperator {
    pub fn evaluate(&self, left: &Number, right: &Number) -> bool {
        match self {
            ComparisonOperator::Less => left < right,
            ComparisonOperator::Greater => left > right,
            ComparisonOperator::LessOrEqual => left <= right,
            ComparisonOperator::GreaterOrEqual => left >= right,
            ComparisonOperator::Equal => left == right,
            ComparisonOperator::NotEqual => left != right,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Less => "<",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
