//! Operand resolution and comparisons.

use std::cmp::Ordering;

use tl_ir::{Number, Punct, Token, TokenKind};

use crate::errors::{custom, type_mismatch, undefined_variable, usage, ExecResult};
use crate::{DictMap, RuntimeState, Shared, Value};

/// Value of an operand: a literal, or the current value of a variable.
pub(crate) fn resolve(state: &RuntimeState, tok: &Token) -> ExecResult<Value> {
    match &tok.kind {
        TokenKind::Number(n) => Ok(Value::from_number(*n)),
        TokenKind::Str(s) => Ok(Value::text(s.clone())),
        TokenKind::Ident(name) => state.lookup(name).ok_or_else(|| undefined_variable(name)),
        TokenKind::Punct(p) => Err(custom(format!("Unexpected '{}'", p.as_str()))),
    }
}

pub(crate) fn number(state: &RuntimeState, tok: &Token) -> ExecResult<Number> {
    let value = resolve(state, tok)?;
    value
        .as_number()
        .ok_or_else(|| type_mismatch("number", value.type_name()))
}

pub(crate) fn integer(state: &RuntimeState, tok: &Token) -> ExecResult<i64> {
    match number(state, tok)? {
        Number::Int(n) => Ok(n),
        Number::Float(_) => Err(type_mismatch("int", "float")),
    }
}

/// Operand rendered as text (numbers formatted, text as is).
pub(crate) fn text(state: &RuntimeState, tok: &Token) -> ExecResult<String> {
    Ok(resolve(state, tok)?.to_string())
}

pub(crate) fn array(state: &RuntimeState, tok: &Token) -> ExecResult<Shared<Vec<Value>>> {
    match resolve(state, tok)? {
        Value::Array(items) => Ok(items),
        other => Err(type_mismatch("array", other.type_name())),
    }
}

pub(crate) fn dict(state: &RuntimeState, tok: &Token) -> ExecResult<Shared<DictMap>> {
    match resolve(state, tok)? {
        Value::Dict(map) => Ok(map),
        other => Err(type_mismatch("dict", other.type_name())),
    }
}

/// Operand that must be a name.
pub(crate) fn name<'t>(
    tok: &'t Token,
    command: &'static str,
    usage_line: &'static str,
) -> ExecResult<&'t str> {
    tok.as_ident().ok_or_else(|| usage(command, usage_line))
}

/// True if `tok` is a name that can extend an optional operand list: not a
/// command word and not the first token of a new line.
pub(crate) fn trailing_name<'t>(state: &RuntimeState, tok: &'t Token) -> Option<&'t str> {
    tok.as_ident()
        .filter(|w| !tok.line_start && !state.is_command_word(w))
}

/// Number of leading tokens that are value operands: literals, or names
/// that are not command words, all on the command's line. Stops at `->`.
pub(crate) fn operand_run(state: &RuntimeState, tokens: &[Token]) -> usize {
    tokens
        .iter()
        .position(|tok| {
            tok.line_start
                || match &tok.kind {
                    TokenKind::Number(_) | TokenKind::Str(_) => false,
                    TokenKind::Ident(word) => state.is_command_word(word),
                    TokenKind::Punct(_) => true,
                }
        })
        .unwrap_or(tokens.len())
}

/// Comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CmpOp {
    pub fn from_token(tok: &Token) -> Option<CmpOp> {
        Some(match tok.as_punct()? {
            Punct::EqEq | Punct::Eq => CmpOp::Eq,
            Punct::NotEq => CmpOp::Ne,
            Punct::Lt => CmpOp::Lt,
            Punct::Gt => CmpOp::Gt,
            Punct::LtEq => CmpOp::Le,
            Punct::GtEq => CmpOp::Ge,
            Punct::Arrow | Punct::LParen | Punct::RParen | Punct::Comma => return None,
        })
    }

    fn test(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Ne => ordering != Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Le => ordering != Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// `a op b`. Numbers compare numerically and text lexically; other pairs
/// support only equality.
pub(crate) fn compare(a: &Value, op: CmpOp, b: &Value) -> ExecResult<bool> {
    let ordering = match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.as_f64().partial_cmp(&y.as_f64()),
            _ => None,
        },
    };
    match (ordering, op) {
        (Some(ordering), _) => Ok(op.test(ordering)),
        (None, CmpOp::Eq) => Ok(a == b),
        (None, CmpOp::Ne) => Ok(a != b),
        (None, _) => Err(custom(format!(
            "Cannot compare {} with {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// Tokens taken by a condition at the start of `tokens`: three for
/// `a op b`, one for a bare truthiness test.
pub(crate) fn condition_len(tokens: &[Token]) -> usize {
    match tokens.get(1) {
        Some(tok) if CmpOp::from_token(tok).is_some() => tokens.len().min(3),
        _ => tokens.len().min(1),
    }
}

/// Evaluate a condition of [`condition_len`] tokens.
pub(crate) fn eval_condition(state: &RuntimeState, tokens: &[Token]) -> ExecResult<bool> {
    match tokens {
        [single] => Ok(resolve(state, single)?.is_truthy()),
        [lhs, op, rhs] => {
            let op = CmpOp::from_token(op).ok_or_else(|| custom("Expected a comparison operator"))?;
            compare(&resolve(state, lhs)?, op, &resolve(state, rhs)?)
        }
        _ => Err(custom("Incomplete condition")),
    }
}

#[cfg(test)]
mod tests;
