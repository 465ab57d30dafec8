//! The command executor.
//!
//! # Architecture
//!
//! [`execute_range`] walks a token range of a [`Program`]. Each leading token
//! is dispatched to a handler, which returns an [`Outcome`]: how many
//! operand tokens it consumed and how control continues ([`Flow`]). The
//! instruction pointer then advances by `1 + consumed`.
//!
//! Handlers report errors by appending a line to the output log and carry
//! on; errors never unwind. The exception is a `try` body: while one is
//! executing, the loop checks after every command whether an error line was
//! appended, pulls the first one back out and raises it as
//! [`Flow::Raise`], which travels outward to the nearest `try`.
//!
//! Block commands find their `end` through the program's block index and
//! run their bodies by re-entering [`execute_range`].

mod basic;
mod classes;
mod collections;
mod command;
pub(crate) mod control;
mod debugger;
pub(crate) mod functions;
mod modules;
mod operand;
mod structs;
mod text;
mod threads;
mod vars;

pub use command::Command;

use tl_ir::Token;

use crate::errors::{unknown_command, usage, ExecResult};
use crate::program::{Body, Program};
use crate::RuntimeState;

/// How control leaves a range.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Ran to the end of the range.
    Normal,
    Break,
    Continue,
    /// `return` with its operand values.
    Return(Vec<crate::Value>),
    /// Error raised inside a `try` body, with the marker stripped.
    Raise(String),
}

/// What a handler did.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub consumed: usize,
    pub flow: Flow,
}

impl Outcome {
    #[inline]
    pub fn consumed(consumed: usize) -> Self {
        Outcome {
            consumed,
            flow: Flow::Normal,
        }
    }

    #[inline]
    pub fn with_flow(consumed: usize, flow: Flow) -> Self {
        Outcome { consumed, flow }
    }
}

/// Signature of a built-in command handler.
pub(crate) type Handler = fn(&mut RuntimeState, &Site<'_>) -> Outcome;

/// A command occurrence: `program.tokens()[at]` is the command word and
/// `end` bounds the range it may consume from.
pub(crate) struct Site<'p> {
    pub program: &'p Program,
    pub at: usize,
    pub end: usize,
}

impl<'p> Site<'p> {
    /// Tokens after the command word, up to the end of the range.
    pub fn rest(&self) -> &'p [Token] {
        self.program
            .tokens()
            .get(self.at + 1..self.end)
            .unwrap_or_default()
    }

    pub fn arg(&self, index: usize) -> Option<&'p Token> {
        self.rest().get(index)
    }

    /// The `end` of the block this command opens.
    pub fn close(&self) -> Option<usize> {
        self.program.blocks().closer(self.at).filter(|&c| c < self.end)
    }

    /// Outcome for a block command: consume through its `end`.
    pub fn through_close(&self, close: usize, flow: Flow) -> Outcome {
        Outcome::with_flow(close - self.at, flow)
    }

    /// Run a command with exactly `arity` operands. Missing operands report
    /// the usage line; errors from `body` are reported and the operands are
    /// still consumed.
    pub fn fixed(
        &self,
        state: &mut RuntimeState,
        arity: usize,
        command: &'static str,
        usage_line: &'static str,
        body: impl FnOnce(&mut RuntimeState, &'p [Token]) -> ExecResult<()>,
    ) -> Outcome {
        let rest = self.rest();
        let Some(args) = rest.get(..arity) else {
            state.report(usage(command, usage_line));
            return Outcome::consumed(rest.len());
        };
        if let Err(err) = body(state, args) {
            state.report(err);
        }
        Outcome::consumed(arity)
    }

    /// Like [`Site::fixed`] for commands that produce a value: the result is
    /// stored in an optional target after the operands, or printed.
    pub fn produce(
        &self,
        state: &mut RuntimeState,
        arity: usize,
        command: &'static str,
        usage_line: &'static str,
        body: impl FnOnce(&mut RuntimeState, &'p [Token]) -> ExecResult<crate::Value>,
    ) -> Outcome {
        let rest = self.rest();
        let Some(args) = rest.get(..arity) else {
            state.report(usage(command, usage_line));
            return Outcome::consumed(rest.len());
        };
        match body(state, args) {
            Ok(value) => Outcome::consumed(arity + self.deliver(state, arity, value)),
            Err(err) => {
                state.report(err);
                Outcome::consumed(arity + usize::from(self.target(state, arity).is_some()))
            }
        }
    }

    /// Identifier at operand `index` if it names a binding target rather than
    /// the next command.
    pub fn target(&self, state: &RuntimeState, index: usize) -> Option<&'p str> {
        self.arg(index)
            .and_then(|tok| operand::trailing_name(state, tok))
    }

    /// Store `value` in the target named at operand `index`, or print it
    /// when there is none. Returns the operands used.
    pub fn deliver(&self, state: &mut RuntimeState, index: usize, value: crate::Value) -> usize {
        match self.target(state, index) {
            Some(name) => {
                state.assign(name, value);
                1
            }
            None => {
                state.output.push(value.to_string());
                0
            }
        }
    }
}

/// Execute a whole program against `state`.
pub fn execute(state: &mut RuntimeState, program: &Program) -> Flow {
    execute_body(state, &Body::whole(program.clone()))
}

pub(crate) fn execute_body(state: &mut RuntimeState, body: &Body) -> Flow {
    execute_range(state, &body.program, body.start, body.end)
}

/// Execute `program.tokens()[start..end]`.
pub(crate) fn execute_range(
    state: &mut RuntimeState,
    program: &Program,
    start: usize,
    end: usize,
) -> Flow {
    let end = end.min(program.len());
    let mut ip = start;
    while ip < end {
        let mark = state.output.mark();
        let outcome = dispatch(state, program, ip, end);
        ip += 1 + outcome.consumed;

        if outcome.flow != Flow::Normal {
            return outcome.flow;
        }
        if state.trap_depth > 0 {
            if let Some(message) = state.output.take_error_since(mark) {
                return Flow::Raise(message);
            }
        }
    }
    Flow::Normal
}

fn dispatch(state: &mut RuntimeState, program: &Program, at: usize, end: usize) -> Outcome {
    let token = &program.tokens()[at];
    debugger::tick(state, token);

    let Some(name) = token.as_ident() else {
        state.report(unknown_command(&token.to_string()));
        return Outcome::consumed(0);
    };

    if let Some(command) = Command::from_name(name) {
        let site = Site { program, at, end };
        return (command.handler())(state, &site);
    }

    if let Some(handler) = state.handlers.get(name) {
        let args = program.tokens().get(at + 1..end).unwrap_or_default();
        let consumed = handler.handle(name, args, state);
        return Outcome::consumed(consumed.min(args.len()));
    }

    tracing::debug!(name, "unknown command");
    state.report(unknown_command(name));
    Outcome::consumed(0)
}

#[cfg(test)]
mod tests;
