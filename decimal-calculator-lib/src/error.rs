//! # Evaluation errors
//!
//! Every failure the calculator can produce is an [`EvaluationError`]. Callers that
//! need to react to the category of a failure rather than its message use
//! [`EvaluationError::kind`].
use crate::interpreter::registry::Arity;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvaluationError>;

/// The category of an [`EvaluationError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Syntax,
    UnknownIdentifier,
    Arity,
    Domain,
    Overflow,
    NestingTooDeep,
}

/// Represents all possible errors that can occur while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// A character that starts no token.
    #[error("illegal character {character:?} at offset {position}")]
    IllegalCharacter { character: char, position: usize },

    /// A numeric literal that cannot be read, e.g. `1e2.3`.
    #[error("malformed number {lexeme:?} at offset {position}")]
    MalformedNumber { lexeme: String, position: usize },

    #[error("syntax error at {lexeme:?} (offset {position})")]
    UnexpectedToken { lexeme: String, position: usize },

    #[error("syntax error: unexpected end of input")]
    UnexpectedEnd,

    /// A postfix program whose instructions do not line up with their operands.
    #[error("malformed program: {0}")]
    MalformedProgram(&'static str),

    #[error("unknown {0:?} function")]
    UnknownFunction(String),

    #[error("unknown {0:?} value")]
    UnknownValue(String),

    #[error("{function}() takes {expected} argument(s) but {given} were given")]
    Arity {
        function: String,
        expected: Arity,
        given: usize,
    },

    #[error("math domain error: {0}")]
    Domain(String),

    #[error("overflow: {0}")]
    Overflow(String),

    #[error("expression nested deeper than {limit} levels at offset {position}")]
    NestingTooDeep { limit: usize, position: usize },
}

impl EvaluationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvaluationError::IllegalCharacter { .. } | EvaluationError::MalformedNumber { .. } => {
                ErrorKind::Lex
            }
            EvaluationError::UnexpectedToken { .. }
            | EvaluationError::UnexpectedEnd
            | EvaluationError::MalformedProgram(_) => ErrorKind::Syntax,
            EvaluationError::UnknownFunction(_) | EvaluationError::UnknownValue(_) => {
                ErrorKind::UnknownIdentifier
            }
            EvaluationError::Arity { .. } => ErrorKind::Arity,
            EvaluationError::Domain(_) => ErrorKind::Domain,
            EvaluationError::Overflow(_) => ErrorKind::Overflow,
            EvaluationError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> EvaluationError {
        EvaluationError::Domain(message.into())
    }

    pub(crate) fn overflow(message: impl Into<String>) -> EvaluationError {
        EvaluationError::Overflow(message.into())
    }
}
