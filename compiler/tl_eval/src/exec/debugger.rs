//! Debugger commands and the per-command hook.
//!
//! Every dispatched command increments a counter. Breakpoints are counter
//! values; reaching one, or any command while stepping, prints a marker
//! line. Execution never actually pauses: the markers and `inspect` dumps
//! are the interface.

use tl_ir::{Token, TokenKind};

use super::operand::name;
use super::{Outcome, Site};
use crate::RuntimeState;

/// Called before each command is dispatched.
pub(crate) fn tick(state: &mut RuntimeState, token: &Token) {
    let debugger = &mut state.debugger;
    debugger.command_count += 1;
    let count = debugger.command_count;
    if debugger.breakpoints.contains(&count) {
        tracing::debug!(count, command = %token, "breakpoint hit");
        state.output.push(format!("[Hit breakpoint at command #{count}]"));
    } else if debugger.stepping {
        tracing::trace!(count, command = %token, "step");
        state.output.push(format!("[Step: command #{count}]"));
    }
}

/// `breakpoint [n]`: break at command `n`, or at the current command.
pub(crate) fn breakpoint(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let explicit = match site.arg(0).map(|t| &t.kind) {
        Some(TokenKind::Number(tl_ir::Number::Int(n))) => u64::try_from(*n).ok(),
        _ => None,
    };
    let at = explicit.unwrap_or(state.debugger.command_count);
    state.debugger.breakpoints.insert(at);
    state.output.push(format!("[Breakpoint set at command #{at}]"));
    Outcome::consumed(usize::from(explicit.is_some()))
}

pub(crate) fn step(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    state.debugger.stepping = true;
    state.output.push("[Step mode enabled]");
    Outcome::consumed(0)
}

pub(crate) fn resume(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    let message = if std::mem::take(&mut state.debugger.stepping) {
        "[Resuming execution]"
    } else {
        "[Not stepping]"
    };
    state.output.push(message);
    Outcome::consumed(0)
}

pub(crate) fn inspect(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    let debugger = &state.debugger;
    let mut lines = vec![format!(
        "=== Debug Inspection (Command #{}) ===",
        debugger.command_count
    )];
    if state.stack.is_empty() {
        lines.push("Stack: empty".to_string());
    } else {
        lines.push(format!("Stack[{}]: {}", state.stack.len(), state.stack_repr()));
    }
    lines.push(format!("Current Value: {}", state.value));

    if debugger.watch.is_empty() {
        let visible = state.capture();
        if !visible.is_empty() {
            let vars: Vec<String> = visible
                .sorted()
                .into_iter()
                .map(|(name, value)| format!("{name}: {}", value.repr()))
                .collect();
            lines.push(format!("Variables[{}]: {{{}}}", vars.len(), vars.join(", ")));
        }
    } else {
        lines.push("Watched Variables:".to_string());
        for var in &debugger.watch {
            let shown = state
                .lookup(var)
                .map_or_else(|| "<not defined>".to_string(), |v| v.repr());
            lines.push(format!("  {var} = {shown}"));
        }
    }
    if !debugger.breakpoints.is_empty() {
        let points: Vec<String> = debugger.breakpoints.iter().map(u64::to_string).collect();
        lines.push(format!("Breakpoints: [{}]", points.join(", ")));
    }
    if debugger.stepping {
        lines.push("Mode: STEPPING".to_string());
    }
    lines.push("=".repeat(40));

    for line in lines {
        state.output.push(line);
    }
    Outcome::consumed(0)
}

pub(crate) fn watch(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "watch", "watch <variable>", |state, args| {
        let var = name(&args[0], "watch", "watch <variable>")?;
        state.debugger.watch.insert(var.to_string());
        state.output.push(format!("[Watching variable '{var}']"));
        Ok(())
    })
}

pub(crate) fn unwatch(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "unwatch", "unwatch <variable>", |state, args| {
        let var = name(&args[0], "unwatch", "unwatch <variable>")?;
        let message = if state.debugger.watch.remove(var) {
            format!("[Stopped watching '{var}']")
        } else {
            format!("[Variable '{var}' was not being watched]")
        };
        state.output.push(message);
        Ok(())
    })
}

pub(crate) fn clear_breakpoints(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    let count = state.debugger.breakpoints.len();
    state.debugger.breakpoints.clear();
    state.output.push(format!("[Cleared {count} breakpoint(s)]"));
    Outcome::consumed(0)
}
