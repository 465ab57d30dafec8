//! Token definitions.

use std::fmt;

use crate::Span;

/// Numeric literal, keeping the integer/float distinction for arithmetic.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Float view of the number.
    #[allow(
        clippy::cast_precision_loss,
        reason = "script numbers are small; float arithmetic accepts the rounding"
    )]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    /// True for any value other than zero.
    pub fn is_truthy(self) -> bool {
        match self {
            Number::Int(n) => n != 0,
            Number::Float(f) => f != 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            // Whole floats keep a trailing `.0` so they read back as floats.
            Number::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Punctuation symbols.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Punct {
    EqEq,
    NotEq,
    LtEq,
    GtEq,
    Lt,
    Gt,
    Arrow,
    Eq,
    LParen,
    RParen,
    Comma,
}

impl Punct {
    pub const fn as_str(self) -> &'static str {
        match self {
            Punct::EqEq => "==",
            Punct::NotEq => "!=",
            Punct::LtEq => "<=",
            Punct::GtEq => ">=",
            Punct::Lt => "<",
            Punct::Gt => ">",
            Punct::Arrow => "->",
            Punct::Eq => "=",
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::Comma => ",",
        }
    }
}

/// The tagged token payload.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Number(Number),
    Str(String),
    Punct(Punct),
}

/// A token with its source span. Immutable once produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// First token on its source line. Header operand lists (`def`
    /// parameters, `catch` names) end before such a token.
    pub line_start: bool,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            span,
            line_start: false,
        }
    }

    #[must_use]
    #[inline]
    pub fn at_line_start(mut self, line_start: bool) -> Self {
        self.line_start = line_start;
        self
    }

    /// Identifier token with no source span.
    pub fn ident(name: impl Into<String>) -> Self {
        Token::new(TokenKind::Ident(name.into()), Span::DUMMY)
    }

    pub fn int(n: i64) -> Self {
        Token::new(TokenKind::Number(Number::Int(n)), Span::DUMMY)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Str(text.into()), Span::DUMMY)
    }

    /// Identifier text, if this is an identifier.
    #[inline]
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// True if this is the identifier `word`.
    #[inline]
    pub fn is_word(&self, word: &str) -> bool {
        self.as_ident() == Some(word)
    }

    #[inline]
    pub fn as_punct(&self) -> Option<Punct> {
        match self.kind {
            TokenKind::Punct(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn is_punct(&self, punct: Punct) -> bool {
        self.as_punct() == Some(punct)
    }

    /// The text a user would see for this token: identifiers and string
    /// contents verbatim, numbers formatted, punctuation as written.
    pub fn text(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) | TokenKind::Str(s) => s.clone(),
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Punct(p) => p.as_str().to_string(),
        }
    }
}

/// Renders the token back as source text (strings quoted and escaped).
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Ident(s) => f.write_str(s),
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Punct(p) => f.write_str(p.as_str()),
            TokenKind::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

#[cfg(test)]
mod tests;
