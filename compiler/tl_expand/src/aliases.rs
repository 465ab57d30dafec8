//! Token aliases.
//!
//! `alias short token` and `alias short ( tokens... )` register a replacement
//! for the identifier `short`. Expansion is a single pass: a replacement that
//! itself names an alias is left as written.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tl_diagnostic::{ErrorCode, PipelineError};
use tl_ir::{Punct, Span, Token};

/// Declaration keyword.
pub const ALIAS: &str = "alias";

/// Registered aliases. Last registration for a name wins.
#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    entries: FxHashMap<String, Vec<Token>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, replacement: Vec<Token>) {
        self.entries.insert(name.into(), replacement);
    }

    pub fn get(&self, name: &str) -> Option<&[Token]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Token])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Malformed alias declaration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AliasError {
    pub message: String,
    pub span: Span,
}

impl From<AliasError> for PipelineError {
    fn from(err: AliasError) -> Self {
        PipelineError::new(ErrorCode::E3001, err.message, err.span)
    }
}

/// Pull alias declarations out of `tokens`.
///
/// Returns `(name, replacement)` pairs in source order and the stream with
/// the declarations removed.
pub fn collect_aliases(tokens: &[Token]) -> Result<(Vec<(String, Vec<Token>)>, Vec<Token>), AliasError> {
    let mut decls = Vec::new();
    let mut rest = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let tok = &tokens[i];
        if !tok.is_word(ALIAS) {
            rest.push(tok.clone());
            i += 1;
            continue;
        }

        let usage = || AliasError {
            message: "Invalid 'alias' declaration. Use: alias <name> <token>".to_string(),
            span: tok.span,
        };
        let name = tokens.get(i + 1).and_then(Token::as_ident).ok_or_else(usage)?;
        let first = tokens.get(i + 2).ok_or_else(usage)?;

        if first.is_punct(Punct::LParen) {
            let body_start = i + 3;
            let len = tokens
                .get(body_start..)
                .and_then(|tail| tail.iter().position(|t| t.is_punct(Punct::RParen)))
                .ok_or_else(|| AliasError {
                    message: format!("Alias '{name}' is missing a closing ')'"),
                    span: first.span,
                })?;
            decls.push((name.to_string(), tokens[body_start..body_start + len].to_vec()));
            i = body_start + len + 1;
        } else {
            decls.push((name.to_string(), vec![first.clone()]));
            i += 3;
        }
    }

    Ok((decls, rest))
}

/// Replace every identifier that names an alias, once.
pub fn expand_aliases(tokens: &[Token], table: &AliasTable) -> Vec<Token> {
    if table.is_empty() {
        return tokens.to_vec();
    }
    let mut out = Vec::with_capacity(tokens.len());
    for tok in tokens {
        match tok.as_ident().and_then(|name| table.get(name)) {
            // Replacement tokens take the use site's span so diagnostics point
            // at the line that used the alias.
            Some(replacement) => out.extend(replacement.iter().enumerate().map(|(n, r)| {
                Token::new(r.kind.clone(), tok.span).at_line_start(n == 0 && tok.line_start)
            })),
            None => out.push(tok.clone()),
        }
    }
    out
}
