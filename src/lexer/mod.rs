mod token;

pub use token::{Token, TokenKind, KEYWORDS};

use thiserror::Error;

pub type Tokens = Vec<Token>;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum LexError {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
}

fn skip_comment(chars: &[char], start: usize) -> Result<usize, LexError> {
    let mut pos = start + 2;
    if chars[start + 1] == '/' {
        while pos < chars.len() && chars[pos] != '\n' {
            pos += 1;
        }
        return Ok(pos);
    }
    while pos + 1 < chars.len() {
        if chars[pos] == '*' && chars[pos + 1] == '/' {
            return Ok(pos + 2);
        }
        pos += 1;
    }
    Err(LexError::UnterminatedComment)
}

fn lex_string(chars: &[char], start: usize) -> Result<(Token, usize), LexError> {
    let mut buf = String::new();
    let mut pos = start + 1;
    while pos < chars.len() {
        match chars[pos] {
            '"' => {
                let token = Token::new(TokenKind::String, buf);
                return Ok((token, pos + 1));
            }
            '\\' if pos + 1 < chars.len() => {
                buf.push('\\');
                buf.push(chars[pos + 1]);
                pos += 2;
            }
            c => {
                buf.push(c);
                pos += 1;
            }
        }
    }
    Err(LexError::UnterminatedString)
}

fn lex_number(chars: &[char], start: usize) -> Result<(Token, usize), LexError> {
    let mut buf = String::new();
    let mut pos = start;
    while pos < chars.len() && chars[pos].is_ascii_digit() {
        buf.push(chars[pos]);
        pos += 1;
    }
    // Decimal part, only when a digit actually follows the dot.
    if pos + 1 < chars.len() && chars[pos] == '.' && chars[pos + 1].is_ascii_digit() {
        buf.push('.');
        pos += 1;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            buf.push(chars[pos]);
            pos += 1;
        }
    }
    if let Some(c) = chars.get(pos) {
        if c.is_ascii_alphabetic() || *c == '_' {
            return Err(LexError::UnexpectedChar(*c));
        }
    }
    Ok((Token::new(TokenKind::Number, buf), pos))
}

fn lex_identifier(chars: &[char], start: usize) -> (Token, usize) {
    let mut buf = String::new();
    let mut pos = start;
    while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_') {
        buf.push(chars[pos]);
        pos += 1;
    }
    let kind = if KEYWORDS.contains(&buf.as_str()) {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    };
    (Token::new(kind, buf), pos)
}

fn lex_operator(chars: &[char], start: usize) -> Result<(Token, usize), LexError> {
    let first = chars[start];
    let second = chars.get(start + 1).copied();
    let pair = second.map(|s| [first, s].iter().collect::<String>());
    if let Some(pair) = pair {
        if matches!(
            pair.as_str(),
            "==" | "!=" | "<=" | ">=" | "&&" | "||" | "++" | "--"
        ) {
            return Ok((Token::new(TokenKind::Operator, pair), start + 2));
        }
    }
    match first {
        '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!' => {
            Ok((Token::new(TokenKind::Operator, first.to_string()), start + 1))
        }
        _ => Err(LexError::UnexpectedChar(first)),
    }
}

pub fn lex(input: &str) -> Result<Tokens, LexError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Tokens::new();
    let mut pos = 0;

    while pos < chars.len() {
        match chars[pos] {
            '/' if matches!(chars.get(pos + 1), Some('/' | '*')) => {
                pos = skip_comment(&chars, pos)?;
            }
            '(' | ')' | '{' | '}' | ';' | ',' => {
                tokens.push(Token::new(TokenKind::Delimiter, chars[pos].to_string()));
                pos += 1;
            }
            '"' => {
                let (token, next) = lex_string(&chars, pos)?;
                tokens.push(token);
                pos = next;
            }
            '0'..='9' => {
                let (token, next) = lex_number(&chars, pos)?;
                tokens.push(token);
                pos = next;
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let (token, next) = lex_identifier(&chars, pos);
                tokens.push(token);
                pos = next;
            }
            '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!' | '&' | '|' => {
                let (token, next) = lex_operator(&chars, pos)?;
                tokens.push(token);
                pos = next;
            }
            c if c.is_whitespace() => pos += 1,
            c => return Err(LexError::UnexpectedChar(c)),
        }
    }
    Ok(tokens)
}
