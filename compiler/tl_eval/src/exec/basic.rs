//! Value register, stack and console commands.

use tl_ir::TokenKind;

use super::{Outcome, Site};
use crate::errors::{custom, integer_overflow, type_mismatch, undefined_variable, usage, ExecError};
use crate::{RuntimeState, Value};

fn update(state: &mut RuntimeState, operation: &'static str, f: impl Fn(i64) -> Option<i64>) -> Outcome {
    match f(state.value) {
        Some(value) => state.value = value,
        None => state.report(integer_overflow(operation)),
    }
    Outcome::consumed(0)
}

pub(crate) fn boot(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    state.value = 0;
    Outcome::consumed(0)
}

pub(crate) fn ping(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    update(state, "ping", |v| v.checked_add(1))
}

pub(crate) fn crash(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    update(state, "crash", |v| v.checked_sub(1))
}

pub(crate) fn hack(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    update(state, "hack", |v| v.checked_mul(2))
}

pub(crate) fn reboot(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    state.value = 0;
    state.stack.clear();
    Outcome::consumed(0)
}

pub(crate) fn upload(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    state.stack.push(Value::Int(state.value));
    Outcome::consumed(0)
}

fn stack_empty() -> ExecError {
    custom("Stack is empty")
}

pub(crate) fn download(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    match state.stack.last().map(Value::as_int) {
        None => state.report(stack_empty()),
        Some(None) => {
            let got = state.stack.last().map_or("nothing", Value::type_name);
            state.report(type_mismatch("int", got));
        }
        Some(Some(n)) => {
            state.stack.pop();
            state.value = n;
        }
    }
    Outcome::consumed(0)
}

pub(crate) fn fork(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    match state.stack.last().cloned() {
        Some(top) => state.stack.push(top),
        None => state.report(stack_empty()),
    }
    Outcome::consumed(0)
}

pub(crate) fn debug(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    let visible = state.capture();
    let vars: Vec<String> = visible
        .sorted()
        .into_iter()
        .map(|(name, value)| format!("{name}: {}", value.repr()))
        .collect();
    let lines = [
        format!("Value: {}", state.value),
        format!("Stack: {}", state.stack_repr()),
        format!("Variables: {{{}}}", vars.join(", ")),
    ];
    for line in lines {
        state.output.push(line);
    }
    Outcome::consumed(0)
}

/// `print` alone (or before another command) prints the value register;
/// otherwise it prints a literal or a variable.
pub(crate) fn print(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let Some(tok) = site.arg(0) else {
        state.output.push(state.value.to_string());
        return Outcome::consumed(0);
    };
    match &tok.kind {
        TokenKind::Str(text) => state.output.push(text.clone()),
        TokenKind::Number(n) => state.output.push(n.to_string()),
        TokenKind::Ident(name) if !state.is_command_word(name) => match state.lookup(name) {
            Some(value) => state.output.push(value.to_string()),
            None => state.report(undefined_variable(name)),
        },
        TokenKind::Ident(_) | TokenKind::Punct(_) => {
            state.output.push(state.value.to_string());
            return Outcome::consumed(0);
        }
    }
    Outcome::consumed(1)
}

/// `input <var>`: next queued input line. Whole-integer lines are stored as
/// integers.
pub(crate) fn input(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let Some(name) = site.target(state, 0) else {
        state.report(usage("input", "input <variable>"));
        return Outcome::consumed(0);
    };
    match state.inputs.pop_front() {
        Some(line) => {
            let value = line
                .trim()
                .parse::<i64>()
                .map_or_else(|_| Value::text(line.clone()), Value::Int);
            state.assign(name, value);
        }
        None => state.report(ExecError::NoInput {
            name: name.to_string(),
        }),
    }
    Outcome::consumed(1)
}
