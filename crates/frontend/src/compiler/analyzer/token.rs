use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The lexical category of a single token, as assigned by the lexer.
/// The analyzer may re-tag a token into [`TokenCategory::Device`] when it is matched
/// within a device clause (`UPON`, `ACCEPT ... FROM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Identifier,
    Numeric,
    String,
    Symbol,
    FigurativeLiteral,
    Reserved,
    Device,
    #[serde(rename = "eof")]
    EOF,
}

/// Display formatting for token categories, used within diagnostics.
impl Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenCategory::Identifier => write!(f, "identifier"),
            TokenCategory::Numeric => write!(f, "numeric literal"),
            TokenCategory::String => write!(f, "string literal"),
            TokenCategory::Symbol => write!(f, "symbol"),
            TokenCategory::FigurativeLiteral => write!(f, "figurative literal"),
            TokenCategory::Reserved => write!(f, "reserved word"),
            TokenCategory::Device => write!(f, "device name"),
            TokenCategory::EOF => write!(f, "EOF"),
        }
    }
}

/// The grammatical context a reserved word was tagged with by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenContext {
    #[default]
    None,
    IsClause,
    IsStatement,
}

/// Represents a single COBOL token handed over by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// The (upper-cased, for words) text of the token.
    pub value: String,

    /// The lexical category of the token.
    pub category: TokenCategory,

    /// The clause/statement context of the token, if any.
    #[serde(default)]
    pub clause_context: TokenContext,

    /// 1-based source line.
    pub line: usize,

    /// 1-based source column.
    pub column: usize,
}

impl Token {
    /// Creates a new token with no clause context.
    pub fn new(value: impl Into<String>, category: TokenCategory, line: usize, column: usize) -> Self {
        Self {
            value: value.into(),
            category,
            clause_context: TokenContext::None,
            line,
            column,
        }
    }

    /// Returns a copy of this token with the given clause context.
    pub fn with_context(mut self, clause_context: TokenContext) -> Self {
        self.clause_context = clause_context;
        self
    }

    /// Creates an EOF sentinel token at the given position.
    pub fn eof(line: usize, column: usize) -> Self {
        Self::new("EOF", TokenCategory::EOF, line, column)
    }

    /// Produces a new annotated token identical to this one, but with a different category.
    /// The original token is left untouched.
    pub fn retagged(&self, category: TokenCategory) -> Token {
        Token {
            category,
            ..self.clone()
        }
    }

    /// Whether this token is the EOF sentinel.
    pub fn is_eof(&self) -> bool {
        self.category == TokenCategory::EOF
    }

    /// Whether this token's text is exactly the given literal.
    pub fn is(&self, literal: &str) -> bool {
        self.value == literal
    }
}

/// Display formatting for tokens, as they are quoted within diagnostics.
impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.category {
            TokenCategory::EOF => write!(f, "EOF"),
            _ => write!(f, "{}", self.value),
        }
    }
}
