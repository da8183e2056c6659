use crate::ast::binary::BinaryOperator;

pub mod binary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumeralSystem {
    Decimal,
    Roman,
}

impl std::fmt::Display for NumeralSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decimal => write!(f, "decimal"),
            Self::Roman => write!(f, "roman"),
        }
    }
}

/// A validated `<operand> <operator> <operand>` line. Both operands belong to `system`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub left: String,
    pub operator: BinaryOperator,
    pub right: String,
    pub system: NumeralSystem,
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}
