//! Variables, arithmetic, the value stack and math commands.
//!
//! Integer arithmetic is checked and stays integral; any float operand
//! makes the result a float. Division and modulo floor toward negative
//! infinity, so `div -7 2` gives `-4` and `mod -7 2` gives `1`.

use tl_ir::Number;

use super::operand::{self, name};
use super::{Outcome, Site};
use crate::errors::{
    custom, division_by_zero, domain_error, integer_overflow, modulo_by_zero, type_mismatch,
    undefined_variable, ExecResult,
};
use crate::{RuntimeState, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Arith {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Arith {
    fn command(self) -> &'static str {
        match self {
            Arith::Add => "add",
            Arith::Sub => "sub",
            Arith::Mul => "mul",
            Arith::Div => "div",
            Arith::Mod => "mod",
        }
    }
}

fn apply(op: Arith, lhs: Number, rhs: Number) -> ExecResult<Number> {
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => {
            let result = match op {
                Arith::Add => a.checked_add(b),
                Arith::Sub => a.checked_sub(b),
                Arith::Mul => a.checked_mul(b),
                Arith::Div if b == 0 => return Err(division_by_zero()),
                Arith::Mod if b == 0 => return Err(modulo_by_zero()),
                Arith::Div => floor_div(a, b),
                Arith::Mod => floor_mod(a, b),
            };
            result
                .map(Number::Int)
                .ok_or_else(|| integer_overflow(op.command()))
        }
        _ => {
            let (a, b) = (lhs.as_f64(), rhs.as_f64());
            Ok(Number::Float(match op {
                Arith::Add => a + b,
                Arith::Sub => a - b,
                Arith::Mul => a * b,
                Arith::Div if b == 0.0 => return Err(division_by_zero()),
                Arith::Mod if b == 0.0 => return Err(modulo_by_zero()),
                Arith::Div => (a / b).floor(),
                Arith::Mod => a - b * (a / b).floor(),
            }))
        }
    }
}

fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

/// `set <var> <value>`
pub(crate) fn set(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 2, "set", "set <variable> <value>", |state, args| {
        let var = name(&args[0], "set", "set <variable> <value>")?;
        let value = operand::resolve(state, &args[1])?;
        state.assign(var, value);
        Ok(())
    })
}

fn arithmetic(state: &mut RuntimeState, site: &Site<'_>, op: Arith, usage_line: &'static str) -> Outcome {
    let command = op.command();
    site.fixed(state, 2, command, usage_line, |state, args| {
        let var = name(&args[0], command, usage_line)?;
        let current = state.lookup(var).ok_or_else(|| undefined_variable(var))?;
        let lhs = current
            .as_number()
            .ok_or_else(|| type_mismatch("number", current.type_name()))?;
        let rhs = operand::number(state, &args[1])?;
        let result = apply(op, lhs, rhs)?;
        state.assign(var, Value::from_number(result));
        Ok(())
    })
}

pub(crate) fn add(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    arithmetic(state, site, Arith::Add, "add <variable> <amount>")
}

pub(crate) fn sub(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    arithmetic(state, site, Arith::Sub, "sub <variable> <amount>")
}

pub(crate) fn mul(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    arithmetic(state, site, Arith::Mul, "mul <variable> <amount>")
}

pub(crate) fn div(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    arithmetic(state, site, Arith::Div, "div <variable> <divisor>")
}

pub(crate) fn modulo(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    arithmetic(state, site, Arith::Mod, "mod <variable> <divisor>")
}

// Stack

pub(crate) fn push(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "push", "push <value>", |state, args| {
        let value = operand::resolve(state, &args[0])?;
        state.stack.push(value);
        Ok(())
    })
}

/// `pop [var]`: pop the top of the stack into `var`, or discard it.
pub(crate) fn pop(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let target = site.target(state, 0);
    match state.stack.pop() {
        Some(value) => {
            if let Some(var) = target {
                state.assign(var, value);
            }
        }
        None => state.report(custom("Stack is empty")),
    }
    Outcome::consumed(usize::from(target.is_some()))
}

pub(crate) fn swap(state: &mut RuntimeState, _site: &Site<'_>) -> Outcome {
    let len = state.stack.len();
    if len < 2 {
        state.report(custom("Stack needs at least two values to swap"));
    } else {
        state.stack.swap(len - 1, len - 2);
    }
    Outcome::consumed(0)
}

// Math

/// Run a math function over `arity` numeric operands.
fn math(
    state: &mut RuntimeState,
    site: &Site<'_>,
    arity: usize,
    command: &'static str,
    usage_line: &'static str,
    f: impl FnOnce(&[Number]) -> ExecResult<Number>,
) -> Outcome {
    site.produce(state, arity, command, usage_line, |state, args| {
        let numbers = args
            .iter()
            .map(|tok| operand::number(state, tok))
            .collect::<ExecResult<Vec<_>>>()?;
        f(&numbers).map(Value::from_number)
    })
}

fn isqrt(n: i64) -> i64 {
    let n = i128::from(n);
    let mut root = (n as f64).sqrt() as i128;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root as i64
}

pub(crate) fn math_sqrt(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    math(state, site, 1, "math_sqrt", "math_sqrt <number> [target]", |args| {
        if args[0].as_f64() < 0.0 {
            return Err(domain_error("Cannot take the square root of a negative number"));
        }
        Ok(match args[0] {
            Number::Int(n) => Number::Int(isqrt(n)),
            Number::Float(x) => Number::Float(x.sqrt()),
        })
    })
}

pub(crate) fn math_pow(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    math(state, site, 2, "math_pow", "math_pow <base> <exponent> [target]", |args| {
        match (args[0], args[1]) {
            (Number::Int(base), Number::Int(exp)) if exp >= 0 => u32::try_from(exp)
                .ok()
                .and_then(|exp| base.checked_pow(exp))
                .map(Number::Int)
                .ok_or_else(|| integer_overflow("math_pow")),
            (base, exp) => Ok(Number::Float(base.as_f64().powf(exp.as_f64()))),
        }
    })
}

pub(crate) fn math_abs(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    math(state, site, 1, "math_abs", "math_abs <number> [target]", |args| {
        match args[0] {
            Number::Int(n) => n
                .checked_abs()
                .map(Number::Int)
                .ok_or_else(|| integer_overflow("math_abs")),
            Number::Float(x) => Ok(Number::Float(x.abs())),
        }
    })
}

fn pick(a: Number, b: Number, take_first: impl Fn(f64, f64) -> bool) -> Number {
    if take_first(a.as_f64(), b.as_f64()) {
        a
    } else {
        b
    }
}

pub(crate) fn math_min(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    math(state, site, 2, "math_min", "math_min <a> <b> [target]", |args| {
        Ok(pick(args[0], args[1], |a, b| a <= b))
    })
}

pub(crate) fn math_max(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    math(state, site, 2, "math_max", "math_max <a> <b> [target]", |args| {
        Ok(pick(args[0], args[1], |a, b| a >= b))
    })
}

pub(crate) fn math_pi(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    math(state, site, 0, "math_pi", "math_pi [target]", |_| {
        Ok(Number::Float(std::f64::consts::PI))
    })
}
