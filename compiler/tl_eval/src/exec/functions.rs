//! Function definition, closures, calls and `return`.
//!
//! # Scoping
//!
//! A call pushes a fresh [`Frame`] holding the parameters. Writes go to that
//! frame only, so nothing a function assigns is visible to its caller. Reads
//! follow the function's [`Link`]: `def` functions fall back to the calling
//! frames, closures to the snapshot taken when `fn` ran, module functions to
//! their module's globals. Static methods read only the globals.
//!
//! # Call resolution
//!
//! For `call a.b`: a method of the instance in variable `a`, then a static
//! method of class `a`, then function `b` of module `a`. Plain names look in
//! the current module first, then global functions, then closures.

use std::sync::Arc;

use tl_ir::{Punct, Token, DO};

use super::operand::{self, name};
use super::{execute_body, Flow, Outcome, Site};
use crate::environment::{Frame, Link};
use crate::errors::{
    no_such_method, undefined_function, usage, wrong_arg_count, ExecError, ExecResult,
};
use crate::program::Body;
use crate::registry::FunctionDef;
use crate::stack::ensure_sufficient_stack;
use crate::{RuntimeState, Value};

/// Deepest allowed nesting of user function calls.
pub const MAX_CALL_DEPTH: usize = 1_000;

/// Name bound to the receiver inside methods and constructors.
pub(crate) const SELF: &str = "self";

/// Parameter names from `from` up to `do`, the first command word, or the
/// end of the header line. Returns the names and the index where the body
/// starts.
pub(crate) fn parse_params(
    state: &RuntimeState,
    tokens: &[Token],
    from: usize,
    close: usize,
) -> (Vec<String>, usize) {
    let mut params = Vec::new();
    let mut i = from;
    while i < close {
        let Some(word) = tokens[i].as_ident() else {
            break;
        };
        if word == DO {
            return (params, i + 1);
        }
        if tokens[i].line_start || state.is_command_word(word) {
            break;
        }
        params.push(word.to_string());
        i += 1;
    }
    (params, i)
}

/// Parse `<keyword> <name> <params...> [do] <body> end` at `site`.
fn parse_definition(
    state: &RuntimeState,
    site: &Site<'_>,
    close: usize,
    keyword: &'static str,
    usage_line: &'static str,
) -> ExecResult<FunctionDef> {
    let tokens = site.program.tokens();
    let head = tokens
        .get(site.at + 1)
        .filter(|_| site.at + 1 < close)
        .ok_or_else(|| usage(keyword, usage_line))?;
    let fn_name = name(head, keyword, usage_line)?;
    let (params, body_start) = parse_params(state, tokens, site.at + 2, close);
    Ok(FunctionDef {
        name: fn_name.to_string(),
        params,
        body: Body::new(site.program.clone(), body_start, close),
        scope: Link::Enclosing,
    })
}

/// `def <name> <params...> [do] ... end`
pub(crate) fn def(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "def <name> <params...> [do] ... end";
    let Some(close) = site.close() else {
        state.report(usage("def", USAGE));
        return Outcome::consumed(0);
    };
    match parse_definition(state, site, close, "def", USAGE) {
        Ok(function) => {
            tracing::trace!(name = %function.name, params = function.params.len(), "function defined");
            state.functions.insert(function.name.clone(), Arc::new(function));
        }
        Err(err) => state.report(err),
    }
    site.through_close(close, Flow::Normal)
}

/// `fn <name> <params...> [do] ... end`: a function that reads through a
/// snapshot of the bindings visible here and now.
pub(crate) fn closure(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "fn <name> <params...> [do] ... end";
    let Some(close) = site.close() else {
        state.report(usage("fn", USAGE));
        return Outcome::consumed(0);
    };
    match parse_definition(state, site, close, "fn", USAGE) {
        Ok(function) => {
            let captured = Arc::new(state.capture());
            tracing::trace!(name = %function.name, captured = captured.len(), "closure created");
            let function = function.rescoped(Link::Captured(captured));
            state.closures.insert(function.name.clone(), Arc::new(function));
        }
        Err(err) => state.report(err),
    }
    site.through_close(close, Flow::Normal)
}

/// A resolved callee: the function and, for methods, its receiver.
pub(crate) struct Callee {
    pub function: Arc<FunctionDef>,
    pub receiver: Option<Value>,
}

pub(crate) fn resolve_callee(state: &RuntimeState, callee: &str) -> ExecResult<Callee> {
    let plain = |function: &Arc<FunctionDef>| Callee {
        function: Arc::clone(function),
        receiver: None,
    };

    if let Some((lhs, member)) = callee.split_once('.') {
        if let Some(Value::Object(instance)) = state.lookup(lhs) {
            let class = instance.read().class.clone();
            let function = super::classes::find_method(state, &class, member)
                .ok_or_else(|| no_such_method(&class, member))?;
            return Ok(Callee {
                function,
                receiver: Some(Value::Object(instance)),
            });
        }
        if let Some(class) = state.classes.get(lhs) {
            return class
                .statics
                .get(member)
                .map(plain)
                .ok_or_else(|| no_such_method(lhs, member));
        }
        if let Some(function) = state.functions.get(callee) {
            return Ok(plain(function));
        }
        if state.modules.contains_key(lhs) {
            return Err(ExecError::ModuleNoFunction {
                module: lhs.to_string(),
                name: member.to_string(),
            });
        }
    }

    let module_local = state
        .current_module()
        .and_then(|module| state.modules.get(module))
        .and_then(|record| record.functions.get(callee));
    module_local
        .or_else(|| state.functions.get(callee))
        .or_else(|| state.closures.get(callee))
        .map(plain)
        .ok_or_else(|| undefined_function(callee))
}

/// Run `function` with positional `args`.
///
/// Returns how the body ended: `Normal`, `Return` with values, or `Raise`
/// when an error inside a `try` body is travelling outward.
pub(crate) fn invoke(state: &mut RuntimeState, callee: &Callee, args: Vec<Value>) -> ExecResult<Flow> {
    let function = &callee.function;
    if args.len() != function.params.len() {
        return Err(wrong_arg_count(&function.name, function.params.len(), args.len()));
    }
    if state.call_depth >= MAX_CALL_DEPTH {
        return Err(ExecError::CallDepth { max: MAX_CALL_DEPTH });
    }

    let mut frame = Frame::new(function.scope.clone());
    if let Some(receiver) = &callee.receiver {
        frame.define(SELF, receiver.clone());
    }
    for (param, arg) in function.params.iter().zip(args) {
        frame.define(param.as_str(), arg);
    }

    state.push_frame(frame);
    state.call_depth += 1;
    let loop_depth = std::mem::take(&mut state.loop_depth);
    let flow = ensure_sufficient_stack(|| execute_body(state, &function.body));
    state.loop_depth = loop_depth;
    state.call_depth -= 1;
    state.pop_frame();

    Ok(match flow {
        Flow::Break | Flow::Continue => Flow::Normal,
        other => other,
    })
}

/// `call <callee> <args...> [-> <results...>]`
pub(crate) fn call(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "call <function> <args...> [-> <results...>]";
    let rest = site.rest();
    let Some(callee) = rest.first().and_then(Token::as_ident) else {
        state.report(usage("call", USAGE));
        return Outcome::consumed(0);
    };

    let arg_count = operand::operand_run(state, &rest[1..]);
    let args_end = 1 + arg_count;
    let has_arrow = rest.get(args_end).is_some_and(|t| t.is_punct(Punct::Arrow));
    let results: Vec<&str> = if has_arrow {
        rest[args_end + 1..]
            .iter()
            .map_while(|tok| operand::trailing_name(state, tok))
            .collect()
    } else {
        Vec::new()
    };
    let consumed = if has_arrow {
        args_end + 1 + results.len()
    } else {
        args_end
    };

    let outcome = resolve_callee(state, callee).and_then(|target| {
        let args = rest[1..args_end]
            .iter()
            .map(|tok| operand::resolve(state, tok))
            .collect::<ExecResult<Vec<_>>>()?;
        tracing::trace!(callee, args = args.len(), depth = state.call_depth, "call");
        invoke(state, &target, args)
    });

    match outcome {
        Ok(Flow::Return(values)) => {
            for (result, value) in results.iter().zip(values) {
                state.assign(*result, value);
            }
            Outcome::consumed(consumed)
        }
        Ok(Flow::Raise(message)) => Outcome::with_flow(consumed, Flow::Raise(message)),
        Ok(_) => Outcome::consumed(consumed),
        Err(err) => {
            state.report(err);
            Outcome::consumed(consumed)
        }
    }
}

/// `return <values...>`
pub(crate) fn return_command(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let rest = site.rest();
    let count = operand::operand_run(state, rest);
    let values = rest[..count]
        .iter()
        .map(|tok| operand::resolve(state, tok))
        .collect::<ExecResult<Vec<_>>>();
    match values {
        Ok(values) => Outcome::with_flow(count, Flow::Return(values)),
        Err(err) => {
            state.report(err);
            Outcome::with_flow(count, Flow::Return(Vec::new()))
        }
    }
}
