/// Every keyword the lexer classifies; most are recognized but rejected
/// by the parser, which only understands the supported subset.
pub const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "int", "long", "register", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while", "printf", "scanf",
];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    String,
    Operator,
    Delimiter,
}

/// A `(kind, lexeme)` pair. String lexemes are stored without the
/// surrounding quotes; escape sequences are kept as raw bytes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    #[inline]
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.is(TokenKind::Keyword, kw)
    }

    #[inline]
    pub fn is_operator(&self, op: &str) -> bool {
        self.is(TokenKind::Operator, op)
    }

    #[inline]
    pub fn is_delimiter(&self, d: &str) -> bool {
        self.is(TokenKind::Delimiter, d)
    }

    /// Keywords that may open a variable declaration.
    #[inline]
    pub fn is_type_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword && matches!(self.lexeme.as_str(), "int" | "char" | "float")
    }

    /// Operators the expression grammar accepts. `&&` and `||` are lexed
    /// but deliberately left out; see the parser.
    #[inline]
    pub fn is_expression_operator(&self) -> bool {
        self.kind == TokenKind::Operator
            && matches!(
                self.lexeme.as_str(),
                "+" | "-" | "*" | "/" | "<" | ">" | "<=" | ">=" | "==" | "!="
            )
    }

    #[inline]
    pub fn is_incdec(&self) -> bool {
        self.kind == TokenKind::Operator && matches!(self.lexeme.as_str(), "++" | "--")
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.kind, self.lexeme)
    }
}
