//! Struct types and instances.
//!
//! `struct` is both a block (a type declaration) and a family of single
//! commands. The block structurer already decided which: a second token from
//! [`STRUCT_OPERATIONS`] makes it a command.

use std::sync::Arc;

use tl_blocks::exceptions::STRUCT_OPERATIONS;
use tl_ir::Token;

use super::operand::{self, name};
use super::{Outcome, Site};
use crate::errors::{
    no_such_field, type_mismatch, undefined_struct_type, unknown_field_type, usage,
    ExecResult,
};
use crate::registry::{FieldType, StructType};
use crate::shared::Shared;
use crate::value::StructInstance;
use crate::{RuntimeState, Value};

const DECLARE_USAGE: &str = "struct <Type> field <name> <type> ... end";

pub(crate) fn struct_command(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let op = site.arg(0).and_then(Token::as_ident);
    match op {
        Some(op) if STRUCT_OPERATIONS.contains(&op) => {
            // Re-anchor on the operation word so operands start at index 0.
            let inner = Site {
                program: site.program,
                at: site.at + 1,
                end: site.end,
            };
            let outcome = match op {
                "new" => new(state, &inner),
                "set" => set(state, &inner),
                "get" => get(state, &inner),
                _ => dump(state, &inner),
            };
            Outcome::consumed(outcome.consumed + 1)
        }
        _ => declare(state, site),
    }
}

fn declare(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let Some(close) = site.close() else {
        state.report(usage("struct", DECLARE_USAGE));
        return Outcome::consumed(0);
    };
    let members = site
        .program
        .tokens()
        .get(site.at + 1..close)
        .unwrap_or_default();
    match parse_declaration(members) {
        Ok(ty) => {
            tracing::trace!(name = %ty.name, fields = ty.fields.len(), "struct type declared");
            state.struct_types.insert(ty.name.clone(), Arc::new(ty));
        }
        Err(err) => state.report(err),
    }
    site.through_close(close, super::Flow::Normal)
}

/// `Type (field name type | name:type)*`
fn parse_declaration(tokens: &[Token]) -> ExecResult<StructType> {
    let (head, mut rest) = tokens
        .split_first()
        .ok_or_else(|| usage("struct", DECLARE_USAGE))?;
    let type_name = name(head, "struct", DECLARE_USAGE)?;
    let mut fields = Vec::new();
    while let Some((tok, tail)) = rest.split_first() {
        let word = name(tok, "struct", DECLARE_USAGE)?;
        let (field, ty, tail) = if word == "field" {
            match tail {
                [field, ty, tail @ ..] => (
                    name(field, "struct", DECLARE_USAGE)?,
                    name(ty, "struct", DECLARE_USAGE)?,
                    tail,
                ),
                _ => return Err(usage("struct", DECLARE_USAGE)),
            }
        } else {
            let (field, ty) = word
                .split_once(':')
                .ok_or_else(|| usage("struct", DECLARE_USAGE))?;
            (field, ty, tail)
        };
        let ty = FieldType::parse(ty).ok_or_else(|| unknown_field_type(ty))?;
        fields.push((field.to_string(), ty));
        rest = tail;
    }
    Ok(StructType {
        name: type_name.to_string(),
        fields,
    })
}

fn instance(state: &RuntimeState, tok: &Token) -> ExecResult<Shared<StructInstance>> {
    match operand::resolve(state, tok)? {
        Value::Struct(instance) => Ok(instance),
        other => Err(type_mismatch("struct", other.type_name())),
    }
}

/// `struct new <Type> <var>`
fn new(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "struct new <Type> <variable>";
    site.fixed(state, 2, "struct", USAGE, |state, args| {
        let type_name = name(&args[0], "struct", USAGE)?;
        let var = name(&args[1], "struct", USAGE)?;
        let ty = state
            .struct_types
            .get(type_name)
            .cloned()
            .ok_or_else(|| undefined_struct_type(type_name))?;
        let fields = ty
            .fields
            .iter()
            .map(|(field, ty)| (field.clone(), ty.default_value()))
            .collect();
        let instance = StructInstance {
            type_name: ty.name.clone(),
            fields,
        };
        state.assign(var, Value::Struct(Shared::new(instance)));
        Ok(())
    })
}

/// `struct set <var> <field> <value>`
fn set(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "struct set <variable> <field> <value>";
    site.fixed(state, 3, "struct", USAGE, |state, args| {
        let instance = instance(state, &args[0])?;
        let field = name(&args[1], "struct", USAGE)?;
        let value = operand::resolve(state, &args[2])?;
        let type_name = instance.read().type_name.clone();
        let declared = state
            .struct_types
            .get(&type_name)
            .and_then(|ty| ty.fields.iter().find(|(f, _)| f == field).map(|&(_, t)| t))
            .ok_or_else(|| no_such_field(&type_name, field))?;
        let got = value.type_name();
        let value = declared
            .coerce(value)
            .ok_or_else(|| type_mismatch(declared.name(), got))?;
        if !instance.write().set(field, value) {
            return Err(no_such_field(&type_name, field));
        }
        Ok(())
    })
}

/// `struct get <var> <field> [target]`
fn get(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "struct get <variable> <field> [target]";
    site.produce(state, 2, "struct", USAGE, |state, args| {
        let instance = instance(state, &args[0])?;
        let field = name(&args[1], "struct", USAGE)?;
        let instance = instance.read();
        instance
            .get(field)
            .cloned()
            .ok_or_else(|| no_such_field(&instance.type_name, field))
    })
}

/// `struct dump <var>`
fn dump(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "struct", "struct dump <variable>", |state, args| {
        let instance = instance(state, &args[0])?;
        let line = Value::Struct(instance).to_string();
        state.output.push(line);
        Ok(())
    })
}
