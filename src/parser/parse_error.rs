use crate::lexer::Token;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("expected token {expected}, but got {got}")]
    ExpectedButGot { expected: Token, got: Token },
    #[error("expected identifier, but got {0}")]
    ExpectedIdentifier(Token),
    #[error("unexpected statement starting with token {0}")]
    UnexpectedStatement(Token),
    #[error("expected '=' or '++'/'--' after identifier, but got {0}")]
    ExpectedAssignOp(Token),
    #[error("bad term in expression: {0}")]
    BadTerm(Token),
    #[error("unknown operator {0}")]
    UnknownOperator(Token),
    #[error("'{0}' is not a valid type keyword here")]
    BadTypeKeyword(String),
    #[error("bad integer constant: {0}")]
    BadConstant(String),
    #[error("bad for-loop initializer starting with {0}")]
    BadForInit(Token),
    #[error("program contains no function definitions")]
    EmptyProgram,
    #[error("reached unexpected EOF")]
    UnexpectedEof,
}
