//! Logos-derived raw tokens.

use logos::{Lexer, Logos};

use crate::LexErrorKind;

/// Raw token produced by logos, before conversion to [`tl_ir::TokenKind`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(error = LexErrorKind)]
pub(crate) enum RawToken {
    #[regex(r"#[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("\"", string_literal)]
    Str(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().map_err(|_| LexErrorKind::InvalidNumber))]
    Int(i64),

    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().map_err(|_| LexErrorKind::InvalidNumber))]
    Float(f64),

    #[regex(r"[A-Za-z_$@][A-Za-z0-9_.$@:/]*")]
    Ident,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("->")]
    Arrow,
    #[token("=")]
    Eq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

/// Consume a block comment body up to and including `*/`.
fn block_comment(lex: &mut Lexer<RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    if let Some(close) = rest.find("*/") {
        lex.bump(close + 2);
        Ok(())
    } else {
        lex.bump(rest.len());
        Err(LexErrorKind::UnterminatedComment)
    }
}

/// Consume a string literal after its opening quote, processing escapes.
fn string_literal(lex: &mut Lexer<RawToken>) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    let mut text = String::new();
    let mut chars = rest.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(i + 1);
                return Ok(text);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, 'r')) => text.push('\r'),
                Some((_, '"')) => text.push('"'),
                Some((_, '\\')) => text.push('\\'),
                Some((_, other)) => {
                    text.push('\\');
                    text.push(other);
                }
                None => break,
            },
            c => text.push(c),
        }
    }

    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedString)
}
