//! Compile-time macros.
//!
//! Expansion keeps an explicit stack of the macro names currently being
//! expanded. Invoking a name already on the stack is a cycle and aborts the
//! pipeline, so expansion always terminates.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tl_blocks::BlockTree;
use tl_diagnostic::{ErrorCode, PipelineError};
use tl_ir::{BlockKind, Span, Token, TokenKind, DO};

/// Invocation keyword.
pub const INLINE: &str = "inline";

/// Guard keyword in a macro header.
pub const WHEN: &str = "when";

/// Parameter sigil in macro bodies.
pub const PARAM_SIGIL: char = '$';

/// A collected macro.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroDefinition {
    pub name: String,
    /// Parameter names, without the sigil.
    pub params: Vec<String>,
    /// Variable that must be non-zero for an invocation to expand.
    pub condition: Option<String>,
    pub body: Vec<Token>,
}

/// Macro name → definition. Later definitions replace earlier ones.
#[derive(Clone, Debug, Default)]
pub struct MacroTable {
    defs: FxHashMap<String, MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, def: MacroDefinition) {
        self.defs.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.defs.get(name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl FromIterator<MacroDefinition> for MacroTable {
    fn from_iter<I: IntoIterator<Item = MacroDefinition>>(iter: I) -> Self {
        let mut table = MacroTable::new();
        for def in iter {
            table.insert(def);
        }
        table
    }
}

/// Truthiness of guard variables in the state doing the expansion.
pub trait ConditionSource {
    fn is_truthy(&self, name: &str) -> bool;
}

/// Macro pass failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MacroError {
    #[error("Macro '{name}' is not defined")]
    Unknown { name: String, span: Span },
    #[error("Macro '{name}' expects {expected} argument(s) but got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    #[error("Recursive macro expansion detected: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String>, span: Span },
    #[error("{message}")]
    Malformed { message: String, span: Span },
}

impl MacroError {
    pub fn span(&self) -> Span {
        match self {
            MacroError::Unknown { span, .. }
            | MacroError::Arity { span, .. }
            | MacroError::Cycle { span, .. }
            | MacroError::Malformed { span, .. } => *span,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            MacroError::Unknown { .. } => ErrorCode::E2001,
            MacroError::Arity { .. } => ErrorCode::E2002,
            MacroError::Cycle { .. } => ErrorCode::E2003,
            MacroError::Malformed { .. } => ErrorCode::E2004,
        }
    }
}

impl From<MacroError> for PipelineError {
    fn from(err: MacroError) -> Self {
        PipelineError::new(err.code(), err.to_string(), err.span())
    }
}

fn malformed(message: impl Into<String>, span: Span) -> MacroError {
    MacroError::Malformed {
        message: message.into(),
        span,
    }
}

/// Pull macro definitions out of `tokens`.
///
/// `blocks` must be the structure of `tokens`. Returns the definitions in
/// source order and the stream with every definition block removed.
pub fn collect_macros(
    tokens: &[Token],
    blocks: &BlockTree,
) -> Result<(Vec<MacroDefinition>, Vec<Token>), MacroError> {
    let mut defs = Vec::new();
    let mut rest = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        if blocks.kind_at(i) != Some(BlockKind::Macro) {
            rest.push(tokens[i].clone());
            i += 1;
            continue;
        }
        let close = blocks.closer(i).unwrap_or(tokens.len());
        defs.push(parse_definition(tokens, i, close)?);
        i = close + 1;
    }

    tracing::debug!(count = defs.len(), "collected macros");
    Ok((defs, rest))
}

/// Parse `macro name params... [when var] do body end` spanning `open..=close`.
fn parse_definition(tokens: &[Token], open: usize, close: usize) -> Result<MacroDefinition, MacroError> {
    let keyword_span = tokens[open].span;
    let name = tokens
        .get(open + 1)
        .filter(|_| open + 1 < close)
        .and_then(Token::as_ident)
        .ok_or_else(|| malformed("Macro definition needs a name", keyword_span))?
        .to_string();

    let mut params = Vec::new();
    let mut condition = None;
    let mut cursor = open + 2;
    loop {
        let Some(tok) = tokens.get(cursor).filter(|_| cursor < close) else {
            return Err(malformed(
                format!("Macro '{name}' is missing a 'do' keyword before its body"),
                keyword_span,
            ));
        };
        cursor += 1;
        match tok.as_ident() {
            Some(DO) => break,
            Some(WHEN) => {
                let guard = tokens
                    .get(cursor)
                    .filter(|_| cursor < close)
                    .and_then(Token::as_ident)
                    .ok_or_else(|| {
                        malformed(format!("Macro '{name}' has 'when' without a variable"), tok.span)
                    })?;
                condition = Some(guard.to_string());
                cursor += 1;
            }
            Some(param) => params.push(param.trim_start_matches(PARAM_SIGIL).to_string()),
            None => {
                return Err(malformed(
                    format!("Macro '{name}' parameters must be names"),
                    tok.span,
                ))
            }
        }
    }

    Ok(MacroDefinition {
        name,
        params,
        condition,
        body: tokens[cursor..close].to_vec(),
    })
}

/// Replace every `inline` site in `tokens` with its expansion.
pub fn expand_macros(
    tokens: &[Token],
    table: &MacroTable,
    conditions: &dyn ConditionSource,
) -> Result<Vec<Token>, MacroError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut expanding = Vec::new();
    expand_into(tokens, table, conditions, &mut expanding, &mut out)?;
    Ok(out)
}

fn expand_into(
    tokens: &[Token],
    table: &MacroTable,
    conditions: &dyn ConditionSource,
    expanding: &mut Vec<String>,
    out: &mut Vec<Token>,
) -> Result<(), MacroError> {
    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];
        if !tok.is_word(INLINE) {
            out.push(tok.clone());
            i += 1;
            continue;
        }

        let name = tokens
            .get(i + 1)
            .and_then(Token::as_ident)
            .ok_or_else(|| malformed("'inline' requires a macro name", tok.span))?;
        let def = table.get(name).ok_or_else(|| MacroError::Unknown {
            name: name.to_string(),
            span: tok.span,
        })?;

        let arg_start = i + 2;
        let arg_end = arg_start + def.params.len();
        let args = tokens.get(arg_start..arg_end).ok_or_else(|| MacroError::Arity {
            name: name.to_string(),
            expected: def.params.len(),
            found: tokens.len().saturating_sub(arg_start),
            span: tok.span,
        })?;

        if expanding.iter().any(|n| n == name) {
            let mut chain = expanding.clone();
            chain.push(name.to_string());
            return Err(MacroError::Cycle {
                chain,
                span: tok.span,
            });
        }

        i = arg_end;
        if let Some(guard) = &def.condition {
            if !conditions.is_truthy(guard) {
                tracing::trace!(name, guard = guard.as_str(), "macro guard false, skipped");
                continue;
            }
        }

        let mut body: Vec<Token> = def
            .body
            .iter()
            .map(|t| substitute(t, &def.params, args))
            .collect();
        // The expansion starts a line wherever the `inline` did.
        if let Some(first) = body.first_mut() {
            first.line_start |= tok.line_start;
        }
        expanding.push(def.name.clone());
        expand_into(&body, table, conditions, expanding, out)?;
        expanding.pop();
    }
    Ok(())
}

/// `$param` → the matching argument token; anything else is copied.
fn substitute(token: &Token, params: &[String], args: &[Token]) -> Token {
    if let TokenKind::Ident(text) = &token.kind {
        if let Some(param) = text.strip_prefix(PARAM_SIGIL) {
            if let Some(pos) = params.iter().position(|p| p == param) {
                return args[pos].clone().at_line_start(token.line_start);
            }
        }
    }
    token.clone()
}
