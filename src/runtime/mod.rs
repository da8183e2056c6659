pub mod interpreter;
pub mod roman;
