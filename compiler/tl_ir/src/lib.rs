//! TechLang IR - tokens and source locations shared by every pipeline stage.
//!
//! The language has no syntax tree: every stage after the lexer works on a
//! flat [`Token`] stream, so the token type is the whole IR.
//!
//! # Architecture
//!
//! - [`Token`] / [`TokenKind`]: identifiers, numbers, strings, punctuation
//! - [`Span`]: byte range of a token in its source text
//! - [`BlockKind`]: the fixed set of block-opening keywords

mod keyword;
mod span;
mod token;

pub use keyword::{is_separator, BlockKind, DO, END};
pub use span::{Span, SpanError};
pub use token::{Number, Punct, Token, TokenKind};
