use serde::Serialize;

/// Kinds of lexical tokens produced by the [`Lexer`](crate::Lexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Other,
    Eof,
    Whitespace,
    Text,
    OpenBracket,
    ClosedBracket,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
    Percent,
    And,
    Or,
}

impl TokenKind {
    pub fn is_gate(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or)
    }

    pub fn is_comparator(self) -> bool {
        self.as_comparator().is_some()
    }

    pub fn as_comparator(self) -> Option<Comparator> {
        match self {
            TokenKind::Equal => Some(Comparator::Equal),
            TokenKind::NotEqual => Some(Comparator::NotEqual),
            TokenKind::GreaterThan => Some(Comparator::GreaterThan),
            TokenKind::GreaterThanOrEqual => Some(Comparator::GreaterThanOrEqual),
            TokenKind::LessThan => Some(Comparator::LessThan),
            TokenKind::LessThanOrEqual => Some(Comparator::LessThanOrEqual),
            TokenKind::Percent => Some(Comparator::Like),
            _ => None,
        }
    }

    pub fn as_gate(self) -> Option<Gate> {
        match self {
            TokenKind::And => Some(Gate::And),
            TokenKind::Or => Some(Gate::Or),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Other => "OTHER",
            TokenKind::Eof => "EOF",
            TokenKind::Whitespace => "WS",
            TokenKind::Text => "STRING",
            TokenKind::OpenBracket => "(",
            TokenKind::ClosedBracket => ")",
            TokenKind::GreaterThan => "GREATER THAN",
            TokenKind::GreaterThanOrEqual => "GREATER THAN OR EQUAL",
            TokenKind::LessThan => "LESS THAN",
            TokenKind::LessThanOrEqual => "LESS THAN OR EQUAL",
            TokenKind::Equal => "EQUAL",
            TokenKind::NotEqual => "NOT EQUAL",
            TokenKind::Percent => "%",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
        };
        f.write_str(name)
    }
}

/// A scanned token and the literal text it was built from.
///
/// Gates and brackets carry their canonical literal, whitespace and end of
/// input carry an empty one. `quoted` is only ever set on text tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub quoted: bool,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
            quoted: false,
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    pub fn whitespace() -> Self {
        Self::new(TokenKind::Whitespace, "")
    }

    pub fn text(literal: impl Into<String>, quoted: bool) -> Self {
        Self {
            kind: TokenKind::Text,
            literal: literal.into(),
            quoted,
        }
    }
}

/// Comparison operator of an [`Expression`](crate::Expression).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Comparator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// `%`, a substring match
    Like,
}

impl Comparator {
    /// The literal as written in a query.
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Equal => "=",
            Comparator::NotEqual => "!=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanOrEqual => ">=",
            Comparator::LessThan => "<",
            Comparator::LessThanOrEqual => "<=",
            Comparator::Like => "%",
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical connective joining two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gate {
    And,
    Or,
}

impl Gate {
    pub fn as_str(self) -> &'static str {
        match self {
            Gate::And => "AND",
            Gate::Or => "OR",
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
