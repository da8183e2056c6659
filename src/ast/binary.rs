use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ASTError {
    #[error("zero division, {0} / 0")]
    DivisionByZero(i64),
    #[error("Integer overflow while trying to compute {0} {2} {1}.")]
    Overflow(i64, i64, char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    pub fn to_symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Division truncates toward zero.
    pub fn apply(&self, left: i64, right: i64) -> Result<i64, ASTError> {
        let result = match self {
            Self::Add => left.checked_add(right),
            Self::Sub => left.checked_sub(right),
            Self::Mul => left.checked_mul(right),
            Self::Div => {
                if right == 0 {
                    return Err(ASTError::DivisionByZero(left));
                }
                left.checked_div(right)
            }
        };

        result.ok_or(ASTError::Overflow(left, right, self.to_symbol()))
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_symbol())
    }
}
