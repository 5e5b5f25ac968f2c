use crate::interpreter::number::Number;
use crate::interpreter::operator::{BinaryOperator, ComparisonOperator, UnaryOperator};
use crate::interpreter::registry::Function;
use itertools::Itertools;
use ptree::item::StringItem;
use ptree::write_tree;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A single step of a postfix program.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Push(Number),
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    Call {
        function: &'static Function,
        arguments: usize,
    },
}

impl Instruction {
    /// How many operands the instruction consumes.
    pub fn operand_count(&self) -> usize {
        match self {
            Instruction::Push(_) => 0,
            Instruction::Unary(_) => 1,
            Instruction::Binary(_) => 2,
            Instruction::Call { arguments, .. } => *arguments,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(value) => write!(f, "{}", value),
            Instruction::Unary(UnaryOperator::Factorial) => write!(f, "!"),
            Instruction::Unary(operator) => write!(f, "({})", operator),
            Instruction::Binary(operator) => write!(f, "{}", operator),
            Instruction::Call {
                function,
                arguments,
            } => write!(f, "{}/{}", function.name, arguments),
        }
    }
}

/// A compiled expression: postfix instructions for the arithmetic, and optionally a
/// comparison against a second arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub(crate) expression: Vec<Instruction>,
    pub(crate) comparison: Option<(ComparisonOperator, Vec<Instruction>)>,
}

impl Program {
    /// The instructions in reverse Polish notation, separated by spaces.
    ///
    /// # Examples
    ///
    /// ```
    /// use decimal_calculator::{compile, Config};
    ///
    /// let program = compile("-3 ** 2 < 2 * (1 + 4)", &Config::default()).unwrap();
    /// assert_eq!(program.postfix(), "3 (-) 2 ** 2 1 4 + * <");
    /// ```
    pub fn postfix(&self) -> String {
        match &self.comparison {
            None => self.expression.iter().join(" "),
            Some((operator, right)) => format!(
                "{} {} {}",
                self.expression.iter().join(" "),
                right.iter().join(" "),
                operator
            ),
        }
    }

    fn format_tree(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let left = new_tree(&self.expression).ok_or(fmt::Error)?;
        let root = match &self.comparison {
            None => left,
            Some((operator, right)) => StringItem {
                text: operator.to_string(),
                children: vec![left, new_tree(right).ok_or(fmt::Error)?],
            },
        };

        let mut buffer: Vec<u8> = Vec::new();
        if write_tree(&root, &mut buffer).is_err() {
            return Err(fmt::Error);
        }
        let text = std::str::from_utf8(&buffer).map_err(|_| fmt::Error)?;
        f.write_str(text)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.format_tree(f)
    }
}

/// Rebuilds the operator tree of a postfix instruction list.
fn new_tree(instructions: &[Instruction]) -> Option<StringItem> {
    let mut operands: Vec<StringItem> = Vec::new();
    for instruction in instructions {
        let count = instruction.operand_count();
        if operands.len() < count {
            return None;
        }
        let children = operands.split_off(operands.len() - count);
        operands.push(StringItem {
            text: instruction.to_string(),
            children,
        });
    }
    match operands.len() {
        1 => operands.pop(),
        _ => None,
    }
}
