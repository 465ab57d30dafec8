//! Conditionals, loops, selection and exception handling.
//!
//! All of these are blocks: the handler reads its header, runs the chosen
//! arm through [`execute_range`] and consumes everything through `end`.
//! Arms are found with [`Program::separators`](crate::program::Program::separators),
//! which only sees separators at the block's own level.

use tl_ir::Token;

use super::operand::{self, CmpOp};
use super::{execute_range, Flow, Outcome, Site};
use crate::errors::{usage, ExecError};
use crate::{RuntimeState, Value};

/// Iterations after which a `while` loop whose condition still holds is
/// abandoned with an error.
pub const MAX_WHILE_ITERATIONS: usize = 10_000;

/// Block commands share this prologue: find the `end` or report usage.
fn block_close(state: &mut RuntimeState, site: &Site<'_>, command: &'static str, usage_line: &'static str) -> Option<usize> {
    let close = site.close();
    if close.is_none() {
        state.report(usage(command, usage_line));
    }
    close
}

/// `if <cond> ... [else ...] end`
pub(crate) fn if_block(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let Some(close) = block_close(state, site, "if", "if <a> <op> <b> ... [else ...] end") else {
        return Outcome::consumed(0);
    };
    let program = site.program;
    let header = site.at + 1;
    let body = header + operand::condition_len(&program.tokens()[header..close]);
    let else_at = program.separators(body, close, &["else"]).first().copied();

    let flow = match operand::eval_condition(state, &program.tokens()[header..body]) {
        Ok(true) => execute_range(state, program, body, else_at.unwrap_or(close)),
        Ok(false) => match else_at {
            Some(else_at) => execute_range(state, program, else_at + 1, close),
            None => Flow::Normal,
        },
        Err(err) => {
            state.report(err);
            Flow::Normal
        }
    };
    site.through_close(close, flow)
}

/// Run one loop iteration's flow. `Some` ends the loop with that flow.
fn loop_exit(flow: Flow) -> Option<Flow> {
    match flow {
        Flow::Normal | Flow::Continue => None,
        Flow::Break => Some(Flow::Normal),
        other => Some(other),
    }
}

/// `loop <count> ... end`. The count is evaluated once.
pub(crate) fn loop_block(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let Some(close) = block_close(state, site, "loop", "loop <count> ... end") else {
        return Outcome::consumed(0);
    };
    let program = site.program;
    let count = match site.arg(0).filter(|_| site.at + 1 < close) {
        Some(tok) => operand::integer(state, tok),
        None => Err(usage("loop", "loop <count> ... end")),
    };
    let count = match count {
        Ok(count) => count,
        Err(err) => {
            state.report(err);
            return site.through_close(close, Flow::Normal);
        }
    };

    state.loop_depth += 1;
    let mut flow = Flow::Normal;
    for _ in 0..count.max(0) {
        if let Some(exit) = loop_exit(execute_range(state, program, site.at + 2, close)) {
            flow = exit;
            break;
        }
    }
    state.loop_depth -= 1;
    site.through_close(close, flow)
}

/// `while <cond> ... end`, re-evaluating the condition before each pass.
pub(crate) fn while_block(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let Some(close) = block_close(state, site, "while", "while <a> <op> <b> ... end") else {
        return Outcome::consumed(0);
    };
    let program = site.program;
    let header = site.at + 1;
    let body = header + operand::condition_len(&program.tokens()[header..close]);
    let condition = &program.tokens()[header..body];

    state.loop_depth += 1;
    let mut iterations = 0;
    let flow = loop {
        match operand::eval_condition(state, condition) {
            Ok(true) => {}
            Ok(false) => break Flow::Normal,
            Err(err) => {
                state.report(err);
                break Flow::Normal;
            }
        }
        if iterations == MAX_WHILE_ITERATIONS {
            tracing::debug!(iterations, "while loop ceiling reached");
            state.report(ExecError::LoopCeiling {
                max: MAX_WHILE_ITERATIONS,
            });
            break Flow::Normal;
        }
        iterations += 1;
        if let Some(exit) = loop_exit(execute_range(state, program, body, close)) {
            break exit;
        }
    };
    state.loop_depth -= 1;
    site.through_close(close, flow)
}

pub(crate) fn switch_block(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    select(state, site, "switch")
}

pub(crate) fn match_block(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    select(state, site, "match")
}

/// `switch`/`match <selector> (case [op] <value> ...)* [default ...] end`.
///
/// The selector is evaluated once; arms are tested in order and the first
/// match runs. A case without an operator tests equality.
fn select(state: &mut RuntimeState, site: &Site<'_>, command: &'static str) -> Outcome {
    const USAGE: &str = "<selector> case <value> ... [default ...] end";
    let Some(close) = block_close(state, site, command, USAGE) else {
        return Outcome::consumed(0);
    };
    let program = site.program;
    let tokens = program.tokens();
    let selector = match site.arg(0).filter(|_| site.at + 1 < close) {
        Some(tok) => operand::resolve(state, tok),
        None => Err(usage(command, USAGE)),
    };
    let selector = match selector {
        Ok(value) => value,
        Err(err) => {
            state.report(err);
            return site.through_close(close, Flow::Normal);
        }
    };

    let arms = program.separators(site.at + 2, close, &["case", "default"]);
    let mut chosen = None;
    let mut default = None;
    for (i, &arm) in arms.iter().enumerate() {
        let arm_end = arms.get(i + 1).copied().unwrap_or(close);
        if tokens[arm].is_word("default") {
            default.get_or_insert((arm + 1, arm_end));
            continue;
        }
        match case_matches(state, &selector, &tokens[arm + 1..arm_end]) {
            Ok(Some(body)) => {
                chosen = Some((arm + 1 + body, arm_end));
                break;
            }
            Ok(None) => {}
            Err(err) => {
                state.report(err);
                return site.through_close(close, Flow::Normal);
            }
        }
    }

    let flow = match chosen.or(default) {
        Some((start, end)) => execute_range(state, program, start, end),
        None => Flow::Normal,
    };
    site.through_close(close, flow)
}

/// Test one `case` arm. On a match, returns the offset of its body.
fn case_matches(state: &RuntimeState, selector: &Value, arm: &[Token]) -> Result<Option<usize>, ExecError> {
    let (op, value_at) = match arm.first().and_then(CmpOp::from_token) {
        Some(op) => (op, 1),
        None => (CmpOp::Eq, 0),
    };
    let tok = arm.get(value_at).ok_or_else(|| usage("case", "case [op] <value> ..."))?;
    let value = operand::resolve(state, tok)?;
    Ok(operand::compare(selector, op, &value)?.then_some(value_at + 1))
}

/// `try ... [catch [err [stack]] ...] [finally ...] end`
///
/// The body stops at its first error. That error's line is withheld from
/// the output; the message and a rendering of the stack are bound to the
/// catch names and the catch arm runs. The finally arm always runs last.
pub(crate) fn try_block(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let Some(close) = block_close(state, site, "try", "try ... catch [error [stack]] ... end") else {
        return Outcome::consumed(0);
    };
    let program = site.program;
    let seps = program.separators(site.at + 1, close, &["catch", "finally"]);
    let find = |word: &str| seps.iter().copied().find(|&i| program.tokens()[i].is_word(word));
    let catch_at = find("catch");
    let finally_at = find("finally");
    let arm_end = |start: usize| seps.iter().copied().find(|&i| i > start).unwrap_or(close);

    state.trap_depth += 1;
    let flow = execute_range(state, program, site.at + 1, arm_end(site.at));
    state.trap_depth -= 1;

    let mut flow = match flow {
        Flow::Raise(message) => match catch_at {
            Some(catch_at) => {
                tracing::trace!(%message, "error caught");
                let end = arm_end(catch_at);
                let bindings = catch_bindings(state, &program.tokens()[catch_at + 1..end]);
                let values = [Value::Text(message), Value::Text(state.stack_repr())];
                for (name, value) in bindings.iter().zip(values) {
                    state.assign(name.as_str(), value);
                }
                execute_range(state, program, catch_at + 1 + bindings.len(), end)
            }
            None => {
                state.report(message);
                Flow::Normal
            }
        },
        other => other,
    };

    if let Some(finally_at) = finally_at {
        let finally_flow = execute_range(state, program, finally_at + 1, arm_end(finally_at));
        if finally_flow != Flow::Normal {
            flow = finally_flow;
        }
    }
    site.through_close(close, flow)
}

/// Up to two names after `catch` on its own line: the error message and the
/// stack.
fn catch_bindings(state: &RuntimeState, tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .take(2)
        .map_while(|tok| operand::trailing_name(state, tok))
        .map(str::to_string)
        .collect()
}

pub(crate) fn break_command(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    loop_control(state, "break", Flow::Break)
}

pub(crate) fn continue_command(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    loop_control(state, "continue", Flow::Continue)
}

fn loop_control(state: &mut RuntimeState, keyword: &'static str, flow: Flow) -> Outcome {
    if state.loop_depth == 0 {
        state.report(ExecError::OutsideLoop { keyword });
        return Outcome::consumed(0);
    }
    Outcome::with_flow(0, flow)
}
