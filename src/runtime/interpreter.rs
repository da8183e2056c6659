use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{
        Expression, NumeralSystem,
        binary::{ASTError, BinaryOperator},
    },
    runtime::roman::{RomanErr, to_integer, to_roman},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpreterErr {
    #[error("{0}")]
    AST(ASTError),
    #[error("{0}")]
    Roman(RomanErr),
    #[error("unknown operation, {0:?}")]
    UnknownOperator(String),
    #[error("incorrect members of an expression, {0:?} is not a {1} number")]
    UnrecognizedOperand(String, NumeralSystem),
}

impl From<ASTError> for InterpreterErr {
    fn from(value: ASTError) -> Self {
        Self::AST(value)
    }
}

impl From<RomanErr> for InterpreterErr {
    fn from(value: RomanErr) -> Self {
        Self::Roman(value)
    }
}

pub fn evaluate(expression: &Expression) -> Result<String, InterpreterErr> {
    let result = match expression.system {
        NumeralSystem::Decimal => {
            evaluate_decimal(&expression.left, expression.operator, &expression.right)
        }
        NumeralSystem::Roman => {
            evaluate_roman(&expression.left, expression.operator, &expression.right)
        }
    }?;
    debug!(%expression, %result, "evaluated expression");
    Ok(result)
}

/// Evaluates raw tokens that did not go through the lexer, so the operator is checked again.
pub fn evaluate_tokens(
    left: &str,
    operator: &str,
    right: &str,
    system: NumeralSystem,
) -> Result<String, InterpreterErr> {
    let operator = BinaryOperator::from_symbol(operator)
        .ok_or_else(|| InterpreterErr::UnknownOperator(operator.to_string()))?;

    evaluate(&Expression {
        left: left.to_string(),
        operator,
        right: right.to_string(),
        system,
    })
}

pub fn evaluate_decimal(
    left: &str,
    operator: BinaryOperator,
    right: &str,
) -> Result<String, InterpreterErr> {
    let parse = |value: &str| {
        value
            .parse::<i64>()
            .map_err(|_| InterpreterErr::UnrecognizedOperand(value.to_string(), NumeralSystem::Decimal))
    };

    let result = operator.apply(parse(left)?, parse(right)?)?;
    Ok(result.to_string())
}

pub fn evaluate_roman(
    left: &str,
    operator: BinaryOperator,
    right: &str,
) -> Result<String, InterpreterErr> {
    let result = operator.apply(to_integer(left)?, to_integer(right)?)?;
    Ok(to_roman(result)?)
}
