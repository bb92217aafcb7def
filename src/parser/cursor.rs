use crate::lexer::{Token, TokenKind};
use crate::parser::{ParseError, Result};

/// One-token-lookahead window over the token sequence. The statement
/// dispatcher additionally peeks one past the current token; nothing
/// ever backtracks.
#[derive(Debug)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub fn bump(&mut self) {
        self.position += 1;
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn bump_if(&mut self, kind: TokenKind, lexeme: &str) -> bool {
        let condition = self.peek().is_some_and(|t| t.is(kind, lexeme));
        if condition {
            self.bump();
        }
        condition
    }

    pub fn expect(&mut self, kind: TokenKind, lexeme: &str) -> Result<()> {
        let next = self.next_or_error()?;
        if next.is(kind, lexeme) {
            Ok(())
        } else {
            Err(ParseError::ExpectedButGot {
                expected: Token::new(kind, lexeme),
                got: next.clone(),
            })
        }
    }

    pub fn peek_or_error(&self) -> Result<&Token> {
        self.peek().ok_or(ParseError::UnexpectedEof)
    }

    pub fn peek_nth_or_error(&self, n: usize) -> Result<&Token> {
        self.peek_nth(n).ok_or(ParseError::UnexpectedEof)
    }

    pub fn next_or_error(&mut self) -> Result<&Token> {
        let next = self
            .tokens
            .get(self.position)
            .ok_or(ParseError::UnexpectedEof)?;
        self.position += 1;
        Ok(next)
    }
}
