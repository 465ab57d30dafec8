//! TechLang lexer.
//!
//! Turns source text into a flat [`Token`] list. Comments (`# ...` to end of
//! line and `/* ... */`) and whitespace are dropped; a string literal is one
//! token with its escapes already processed.
//!
//! The first error stops the scan: a script that does not tokenize is never
//! executed, so there is nothing to gain from recovery.

mod lex_error;
mod raw_token;

use logos::Logos;
use tl_ir::{Number, Punct, Span, Token, TokenKind};

pub use lex_error::{LexError, LexErrorKind};
use raw_token::RawToken;

/// Tokenize `source`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);
    let mut last_end = 0;

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::try_from_range(range.clone())
            .map_err(|_| LexError::new(LexErrorKind::InvalidCharacter, Span::DUMMY, ""))?;
        let slice = source.get(range.clone()).unwrap_or_default();

        let raw = result.map_err(|kind| LexError::new(kind, span, slice))?;
        let kind = match raw {
            RawToken::LineComment | RawToken::BlockComment => continue,
            RawToken::Str(text) => TokenKind::Str(text),
            RawToken::Int(n) => TokenKind::Number(Number::Int(n)),
            RawToken::Float(f) => TokenKind::Number(Number::Float(f)),
            RawToken::Ident => TokenKind::Ident(slice.to_string()),
            RawToken::EqEq => TokenKind::Punct(Punct::EqEq),
            RawToken::NotEq => TokenKind::Punct(Punct::NotEq),
            RawToken::LtEq => TokenKind::Punct(Punct::LtEq),
            RawToken::GtEq => TokenKind::Punct(Punct::GtEq),
            RawToken::Lt => TokenKind::Punct(Punct::Lt),
            RawToken::Gt => TokenKind::Punct(Punct::Gt),
            RawToken::Arrow => TokenKind::Punct(Punct::Arrow),
            RawToken::Eq => TokenKind::Punct(Punct::Eq),
            RawToken::LParen => TokenKind::Punct(Punct::LParen),
            RawToken::RParen => TokenKind::Punct(Punct::RParen),
            RawToken::Comma => TokenKind::Punct(Punct::Comma),
        };
        let line_start = tokens.is_empty()
            || source
                .get(last_end..range.start)
                .is_some_and(|gap| gap.contains('\n'));
        last_end = range.end;
        tokens.push(Token::new(kind, span).at_line_start(line_start));
    }

    tracing::trace!(count = tokens.len(), "tokenized");
    Ok(tokens)
}

#[cfg(test)]
mod tests;
