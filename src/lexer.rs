use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{Expression, NumeralSystem, binary::BinaryOperator},
    runtime::roman::{is_decimal, is_roman},
};

const SEPARATOR: char = ' ';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("bad expression, expected 3 tokens but found {0}")]
    MalformedExpression(usize),
    #[error("incorrect members of an expression, {0:?} and {1:?}")]
    UnrecognizedOperands(String, String),
    #[error("unknown operation, {0:?}")]
    UnknownOperator(String),
}

/// Strips one `\n`, then one `\r`. Any other whitespace is significant.
pub fn trim_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

pub fn classify(left: &str, right: &str) -> Option<NumeralSystem> {
    if is_decimal(left) && is_decimal(right) {
        Some(NumeralSystem::Decimal)
    } else if is_roman(left) && is_roman(right) {
        Some(NumeralSystem::Roman)
    } else {
        None
    }
}

pub fn tokenize(line: &str) -> Result<Expression, LexerError> {
    let parts: Vec<&str> = trim_line_terminator(line).split(SEPARATOR).collect();

    let [left, operator, right] = parts[..] else {
        return Err(LexerError::MalformedExpression(parts.len()));
    };

    let Some(system) = classify(left, right) else {
        return Err(LexerError::UnrecognizedOperands(
            left.to_string(),
            right.to_string(),
        ));
    };

    let Some(operator) = BinaryOperator::from_symbol(operator) else {
        return Err(LexerError::UnknownOperator(operator.to_string()));
    };

    let expression = Expression {
        left: left.to_string(),
        operator,
        right: right.to_string(),
        system,
    };
    debug!(%expression, %system, "classified expression");

    Ok(expression)
}
