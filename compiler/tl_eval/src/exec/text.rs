//! String commands.
//!
//! Positions count characters, not bytes. Commands that produce a value
//! store it in an optional trailing target variable, or print it.

use super::operand::{self, name};
use super::{Outcome, Site};
use crate::errors::{domain_error, type_mismatch, undefined_variable, ExecResult};
use crate::{RuntimeState, Value};

fn text_operand(state: &RuntimeState, tok: &tl_ir::Token) -> ExecResult<String> {
    match operand::resolve(state, tok)? {
        Value::Text(text) => Ok(text),
        other => Err(type_mismatch("string", other.type_name())),
    }
}

pub(crate) fn str_create(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "str_create <name> <value>";
    site.fixed(state, 2, "str_create", USAGE, |state, args| {
        let var = name(&args[0], "str_create", USAGE)?;
        let text = operand::text(state, &args[1])?;
        state.assign(var, Value::Text(text));
        Ok(())
    })
}

pub(crate) fn str_concat(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "str_concat <name> <value>";
    site.fixed(state, 2, "str_concat", USAGE, |state, args| {
        let var = name(&args[0], "str_concat", USAGE)?;
        let mut text = match state.lookup(var) {
            Some(Value::Text(text)) => text,
            Some(other) => return Err(type_mismatch("string", other.type_name())),
            None => return Err(undefined_variable(var)),
        };
        text.push_str(&operand::text(state, &args[1])?);
        state.assign(var, Value::Text(text));
        Ok(())
    })
}

pub(crate) fn str_length(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 1, "str_length", "str_length <string> [target]", |state, args| {
        let text = text_operand(state, &args[0])?;
        Ok(Value::Int(i64::try_from(text.chars().count()).unwrap_or(i64::MAX)))
    })
}

/// Clamp a possibly out-of-range position into `0..=len`.
fn clamp(index: i64, len: usize) -> usize {
    usize::try_from(index.max(0)).map_or(len, |i| i.min(len))
}

pub(crate) fn str_substring(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "str_substring <string> <start> <end> [target]";
    site.produce(state, 3, "str_substring", USAGE, |state, args| {
        let text = text_operand(state, &args[0])?;
        let len = text.chars().count();
        let start = clamp(operand::integer(state, &args[1])?, len);
        let end = clamp(operand::integer(state, &args[2])?, len);
        let slice: String = text.chars().skip(start).take(end.saturating_sub(start)).collect();
        Ok(Value::Text(slice))
    })
}

pub(crate) fn str_upper(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 1, "str_upper", "str_upper <string> [target]", |state, args| {
        Ok(Value::Text(text_operand(state, &args[0])?.to_uppercase()))
    })
}

pub(crate) fn str_lower(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 1, "str_lower", "str_lower <string> [target]", |state, args| {
        Ok(Value::Text(text_operand(state, &args[0])?.to_lowercase()))
    })
}

pub(crate) fn str_contains(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "str_contains <string> <needle> [target]";
    site.produce(state, 2, "str_contains", USAGE, |state, args| {
        let haystack = text_operand(state, &args[0])?;
        let needle = operand::text(state, &args[1])?;
        Ok(Value::Int(i64::from(haystack.contains(&needle))))
    })
}

pub(crate) fn str_split(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "str_split <string> <delimiter> [target]";
    site.produce(state, 2, "str_split", USAGE, |state, args| {
        let text = text_operand(state, &args[0])?;
        let delimiter = operand::text(state, &args[1])?;
        if delimiter.is_empty() {
            return Err(domain_error("Cannot split on an empty delimiter"));
        }
        let parts = text.split(&delimiter).map(Value::text).collect();
        Ok(Value::array(parts))
    })
}
