use std::fmt;
use thiserror::Error;

#[derive(Error)]
pub enum DriverError {
    #[error("file {0} does not exist")]
    InputFileDoesNotExist(String),
    #[cfg(feature = "lexer")]
    #[error("lex error: {0}")]
    Lex(#[from] sxcc::lexer::LexError),
    #[cfg(feature = "parser")]
    #[error("parse error: {0}")]
    Parse(#[from] sxcc::parser::ParseError),
    #[cfg(feature = "semantic_analysis")]
    #[error("semantic error: {0}")]
    Semantic(#[from] sxcc::semantic_analysis::SemanticError),
    #[cfg(feature = "codegen")]
    #[error("codegen error: {0}")]
    Codegen(#[from] sxcc::codegen::CodegenError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// main's error path prints with {:?}; route it through Display so the
// user sees the message, not the variant.
impl fmt::Debug for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
