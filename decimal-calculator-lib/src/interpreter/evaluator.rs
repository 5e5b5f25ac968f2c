use crate::error::{EvaluationError, Result};
use crate::interpreter::context::Context;
use crate::interpreter::number::Number;
use crate::interpreter::syntax::program::{Instruction, Program};
use crate::interpreter::value::Value;

/// Runs a compiled program on an operand stack.
///
/// # Arguments
///
/// * `program`: The program to run.
/// * `context`: The precision and exponent range of the arithmetic.
///
/// returns: A number, or a boolean if the program ends in a comparison.
pub fn run(program: &Program, context: &Context) -> Result<Value> {
    let left = execute(&program.expression, context)?;
    match &program.comparison {
        None => Ok(Value::Number(left)),
        Some((operator, instructions)) => {
            let right = execute(instructions, context)?;
            Ok(Value::Boolean(operator.evaluate(&left, &right)))
        }
    }
}

fn execute(instructions: &[Instruction], context: &Context) -> Result<Number> {
    let mut operands: Vec<Number> = Vec::new();

    for instruction in instructions {
        let result = match instruction {
            Instruction::Push(value) => context.round(value.clone())?,
            Instruction::Unary(operator) => {
                let operand = pop(&mut operands)?;
                operator.evaluate(&operand, context)?
            }
            Instruction::Binary(operator) => {
                let right = pop(&mut operands)?;
                let left = pop(&mut operands)?;
                operator.evaluate(&left, &right, context)?
            }
            Instruction::Call {
                function,
                arguments,
            } => {
                if operands.len() < *arguments {
                    return Err(EvaluationError::MalformedProgram(
                        "call has fewer arguments than it expects",
                    ));
                }
                let arguments = operands.split_off(operands.len() - arguments);
                function.call(&arguments, context)?
            }
        };
        operands.push(result);
    }

    let result = pop(&mut operands)?;
    if !operands.is_empty() {
        return Err(EvaluationError::MalformedProgram(
            "operands left over after the last instruction",
        ));
    }
    Ok(result)
}

fn pop(operands: &mut Vec<Number>) -> Result<Number> {
    operands
        .pop()
        .ok_or(EvaluationError::MalformedProgram("expected an operand"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::interpreter::operator::{BinaryOperator, ComparisonOperator, UnaryOperator};
    use crate::interpreter::registry::find_function;

    fn push(text: &str) -> Instruction {
        Instruction::Push(text.parse().unwrap())
    }

    fn number(text: &str) -> Number {
        text.parse().unwrap()
    }

    fn run_expression(expression: Vec<Instruction>) -> Result<Value> {
        let program = Program {
            expression,
            comparison: None,
        };
        run(&program, &Context::default())
    }

    #[test]
    fn operands_are_applied_in_order() {
        // 7 - 2 ** 3
        let value = run_expression(vec![
            push("7"),
            push("2"),
            push("3"),
            Instruction::Binary(BinaryOperator::Exponentiate),
            Instruction::Binary(BinaryOperator::Subtract),
        ])
        .unwrap();

        assert_eq!(value, Value::Number(number("-1")));
    }

    #[test]
    fn calls_take_their_arguments_from_the_stack() {
        let value = run_expression(vec![
            push("2"),
            push("3"),
            push("4"),
            Instruction::Call {
                function: find_function("hypot").unwrap(),
                arguments: 2,
            },
            Instruction::Binary(BinaryOperator::Multiply),
        ])
        .unwrap();

        assert_eq!(value, Value::Number(number("10")));
    }

    #[test]
    fn comparison_yields_a_boolean() {
        let program = Program {
            expression: vec![push("2"), Instruction::Unary(UnaryOperator::Negate)],
            comparison: Some((ComparisonOperator::Less, vec![push("1")])),
        };

        assert_eq!(
            run(&program, &Context::default()).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn literals_are_rounded_to_context() {
        let value = run_expression(vec![push("1.23456789012345678901234567890123")]).unwrap();

        assert_eq!(
            value,
            Value::Number(number("1.234567890123456789012345679"))
        );
    }

    #[test]
    fn missing_operand_is_a_malformed_program() {
        let error = run_expression(vec![push("1"), Instruction::Binary(BinaryOperator::Add)])
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn leftover_operand_is_a_malformed_program() {
        let error = run_expression(vec![push("1"), push("2")]).unwrap_err();

        assert!(matches!(error, EvaluationError::MalformedProgram(_)));
    }

    #[test]
    fn empty_program_is_malformed() {
        assert!(run_expression(vec![]).is_err());
    }
}
