//! Array and dictionary commands.
//!
//! Arrays and dictionaries are shared containers: `set b a` makes `b` see
//! the same array as `a`, and closures capture them by reference.

use super::operand::{self, name};
use super::{Outcome, Site};
use crate::errors::{custom, index_out_of_bounds, key_not_found, usage, ExecResult};
use crate::{DictMap, RuntimeState, Value};

fn slot(index: i64, len: usize, array: &str) -> ExecResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_bounds(array, index, len))
}

/// `array_create <name> [size]`: zero-filled when a size is given.
pub(crate) fn array_create(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "array_create <name> [size]";
    let Some(first) = site.arg(0) else {
        state.report(usage("array_create", USAGE));
        return Outcome::consumed(0);
    };
    let sized = site
        .arg(1)
        .is_some_and(|tok| !tok.as_ident().is_some_and(|w| state.is_command_word(w)));
    let result = name(first, "array_create", USAGE).and_then(|var| {
        let size = match site.arg(1).filter(|_| sized) {
            Some(tok) => operand::integer(state, tok)?,
            None => 0,
        };
        let size = usize::try_from(size).map_err(|_| custom("Array size must be non-negative"))?;
        Ok((var, size))
    });
    match result {
        Ok((var, size)) => state.assign(var, Value::array(vec![Value::Int(0); size])),
        Err(err) => state.report(err),
    }
    Outcome::consumed(1 + usize::from(sized))
}

pub(crate) fn array_set(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 3, "array_set", "array_set <array> <index> <value>", |state, args| {
        let items = operand::array(state, &args[0])?;
        let index = operand::integer(state, &args[1])?;
        let value = operand::resolve(state, &args[2])?;
        let mut items = items.write();
        let at = slot(index, items.len(), &args[0].text())?;
        items[at] = value;
        Ok(())
    })
}

pub(crate) fn array_get(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 2, "array_get", "array_get <array> <index> [target]", |state, args| {
        let items = operand::array(state, &args[0])?;
        let index = operand::integer(state, &args[1])?;
        let items = items.read();
        let at = slot(index, items.len(), &args[0].text())?;
        Ok(items[at].clone())
    })
}

pub(crate) fn array_push(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 2, "array_push", "array_push <array> <value>", |state, args| {
        let items = operand::array(state, &args[0])?;
        let value = operand::resolve(state, &args[1])?;
        items.write().push(value);
        Ok(())
    })
}

pub(crate) fn array_pop(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 1, "array_pop", "array_pop <array> [target]", |state, args| {
        let items = operand::array(state, &args[0])?;
        let popped = items.write().pop();
        popped.ok_or_else(|| custom(format!("Array '{}' is empty", args[0].text())))
    })
}

pub(crate) fn array_length(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 1, "array_length", "array_length <array> [target]", |state, args| {
        let len = operand::array(state, &args[0])?.read().len();
        Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
    })
}

pub(crate) fn dict_create(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "dict_create", "dict_create <name>", |state, args| {
        let var = name(&args[0], "dict_create", "dict_create <name>")?;
        state.assign(var, Value::dict(DictMap::new()));
        Ok(())
    })
}

pub(crate) fn dict_set(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 3, "dict_set", "dict_set <dict> <key> <value>", |state, args| {
        let map = operand::dict(state, &args[0])?;
        let key = operand::text(state, &args[1])?;
        let value = operand::resolve(state, &args[2])?;
        map.write().insert(key, value);
        Ok(())
    })
}

pub(crate) fn dict_get(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 2, "dict_get", "dict_get <dict> <key> [target]", |state, args| {
        let map = operand::dict(state, &args[0])?;
        let key = operand::text(state, &args[1])?;
        let found = map.read().get(&key).cloned();
        found.ok_or_else(|| key_not_found(&args[0].text(), &key))
    })
}

/// Keys in sorted order, as an array.
pub(crate) fn dict_keys(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 1, "dict_keys", "dict_keys <dict> [target]", |state, args| {
        let map = operand::dict(state, &args[0])?;
        let keys = map.read().keys().map(|k| Value::text(k.as_str())).collect();
        Ok(Value::array(keys))
    })
}

pub(crate) fn dict_has(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 2, "dict_has", "dict_has <dict> <key> [target]", |state, args| {
        let map = operand::dict(state, &args[0])?;
        let key = operand::text(state, &args[1])?;
        let has = map.read().contains_key(&key);
        Ok(Value::Int(i64::from(has)))
    })
}
