//! Classes, instances and field access.
//!
//! A class body holds `field` declarations and `method`, `static` and
//! `init` blocks. Instances own their fields; the receiver is bound as
//! `self` inside methods and `init`. Lookups of methods, constructors and
//! field declarations walk the single-inheritance chain from the
//! instance's class upward.

use std::collections::BTreeMap;
use std::sync::Arc;

use tl_ir::{Token, TokenKind};

use super::functions::{invoke, parse_params, Callee};
use super::operand::{self, name};
use super::{Flow, Outcome, Site};
use crate::environment::Link;
use crate::errors::{
    custom, no_such_field, type_mismatch, undefined_class, unknown_field_type, usage,
    wrong_arg_count, ExecResult,
};
use crate::program::Body;
use crate::registry::{ClassDef, FieldDecl, FieldType, FunctionDef};
use crate::shared::Shared;
use crate::value::ClassInstance;
use crate::{RuntimeState, Value};

const CLASS_USAGE: &str = "class <Name> [extends <Parent>] ... end";

/// The class and its ancestors, nearest first.
fn lineage(state: &RuntimeState, class: &str) -> Vec<Arc<ClassDef>> {
    let mut chain: Vec<Arc<ClassDef>> = Vec::new();
    let mut next = Some(class.to_string());
    while let Some(name) = next {
        let Some(def) = state.classes.get(&name) else {
            break;
        };
        if chain.iter().any(|seen| seen.name == def.name) {
            break;
        }
        next = def.parent.clone();
        chain.push(Arc::clone(def));
    }
    chain
}

pub(crate) fn find_method(state: &RuntimeState, class: &str, method: &str) -> Option<Arc<FunctionDef>> {
    lineage(state, class)
        .iter()
        .find_map(|def| def.methods.get(method).cloned())
}

fn find_field(state: &RuntimeState, class: &str, field: &str) -> Option<FieldDecl> {
    lineage(state, class)
        .iter()
        .find_map(|def| def.fields.iter().find(|f| f.name == field).cloned())
}

/// `class <Name> [extends <Parent>] members... end`
pub(crate) fn class(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    let Some(close) = site.close() else {
        state.report(usage("class", CLASS_USAGE));
        return Outcome::consumed(0);
    };
    match parse_class(state, site, close) {
        Ok(def) => {
            tracing::trace!(
                name = %def.name,
                fields = def.fields.len(),
                methods = def.methods.len(),
                "class defined"
            );
            state.classes.insert(def.name.clone(), Arc::new(def));
        }
        Err(err) => state.report(err),
    }
    site.through_close(close, Flow::Normal)
}

fn parse_class(state: &RuntimeState, site: &Site<'_>, close: usize) -> ExecResult<ClassDef> {
    let program = site.program;
    let tokens = program.tokens();
    let head = tokens
        .get(site.at + 1)
        .filter(|_| site.at + 1 < close)
        .ok_or_else(|| usage("class", CLASS_USAGE))?;
    let class_name = name(head, "class", CLASS_USAGE)?;
    let mut def = ClassDef {
        name: class_name.to_string(),
        ..ClassDef::default()
    };

    let mut i = site.at + 2;
    if tokens[i..close].first().is_some_and(|t| t.is_word("extends")) {
        let parent = tokens
            .get(i + 1)
            .filter(|_| i + 1 < close)
            .and_then(Token::as_ident)
            .ok_or_else(|| usage("class", CLASS_USAGE))?;
        if !state.classes.contains_key(parent) {
            return Err(undefined_class(parent));
        }
        def.parent = Some(parent.to_string());
        i += 2;
    }

    while i < close {
        let word = tokens[i].as_ident().unwrap_or_default();
        if word == "field" {
            let (field, used) = parse_field(&tokens[i + 1..close])?;
            def.fields.push(field);
            i += 1 + used;
            continue;
        }
        let Some(end) = program.blocks().closer(i) else {
            return Err(custom(format!(
                "Unexpected '{}' in class '{class_name}'",
                tokens[i].text()
            )));
        };
        let (member, body_from) = if word == "init" {
            ("init", i + 1)
        } else {
            let member = tokens
                .get(i + 1)
                .filter(|_| i + 1 < end)
                .and_then(Token::as_ident)
                .ok_or_else(|| usage("class", "method <name> <params...> ... end"))?;
            (member, i + 2)
        };
        let (params, body_start) = parse_params(state, tokens, body_from, end);
        let function = Arc::new(FunctionDef {
            name: format!("{class_name}.{member}"),
            params,
            body: Body::new(program.clone(), body_start, end),
            // Static members never see an instance, so they skip the caller.
            scope: if word == "static" { Link::Global } else { Link::Enclosing },
        });
        match word {
            "init" => def.init = Some(function),
            "static" => {
                def.statics.insert(member.to_string(), function);
            }
            _ => {
                def.methods.insert(member.to_string(), function);
            }
        }
        i = end + 1;
    }
    Ok(def)
}

/// `<name> <type> [default]` after `field`. Returns the tokens used.
fn parse_field(tokens: &[Token]) -> ExecResult<(FieldDecl, usize)> {
    const USAGE: &str = "field <name> <type> [default]";
    let [field, ty, rest @ ..] = tokens else {
        return Err(usage("field", USAGE));
    };
    let field = name(field, "field", USAGE)?;
    let ty_name = name(ty, "field", USAGE)?;
    let ty = FieldType::parse(ty_name).ok_or_else(|| unknown_field_type(ty_name))?;
    let default = match rest.first().map(|t| &t.kind) {
        Some(TokenKind::Number(n)) => Some(Value::from_number(*n)),
        Some(TokenKind::Str(s)) => Some(Value::text(s.as_str())),
        _ => None,
    };
    let used = 2 + usize::from(default.is_some());
    let default = match default {
        Some(value) => {
            let got = value.type_name();
            Some(ty.coerce(value).ok_or_else(|| type_mismatch(ty.name(), got))?)
        }
        None => None,
    };
    Ok((
        FieldDecl {
            name: field.to_string(),
            ty,
            default,
        },
        used,
    ))
}

/// `new <Class> <var> <args...>`
pub(crate) fn new_instance(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "new <Class> <variable> <args...>";
    let rest = site.rest();
    let (Some(class_tok), Some(var_tok)) = (rest.first(), rest.get(1)) else {
        state.report(usage("new", USAGE));
        return Outcome::consumed(rest.len());
    };
    let arg_count = operand::operand_run(state, &rest[2..]);
    let consumed = 2 + arg_count;

    let result = construct(state, class_tok, var_tok, &rest[2..consumed]);
    match result {
        Ok(Flow::Raise(message)) => Outcome::with_flow(consumed, Flow::Raise(message)),
        Ok(_) => Outcome::consumed(consumed),
        Err(err) => {
            state.report(err);
            Outcome::consumed(consumed)
        }
    }
}

fn construct(state: &mut RuntimeState, class_tok: &Token, var_tok: &Token, args: &[Token]) -> ExecResult<Flow> {
    const USAGE: &str = "new <Class> <variable> <args...>";
    let class = name(class_tok, "new", USAGE)?;
    let var = name(var_tok, "new", USAGE)?;
    let chain = lineage(state, class);
    if chain.is_empty() {
        return Err(undefined_class(class));
    }

    // Ancestors first, so a subclass's declaration wins.
    let mut fields = BTreeMap::new();
    for def in chain.iter().rev() {
        for field in &def.fields {
            fields.insert(field.name.clone(), field.initial_value());
        }
    }
    let instance = Value::Object(Shared::new(ClassInstance {
        class: class.to_string(),
        fields,
    }));
    state.assign(var, instance.clone());

    let args = args
        .iter()
        .map(|tok| operand::resolve(state, tok))
        .collect::<ExecResult<Vec<_>>>()?;
    match chain.iter().find_map(|def| def.init.clone()) {
        Some(init) => invoke(
            state,
            &Callee {
                function: init,
                receiver: Some(instance),
            },
            args,
        ),
        None if args.is_empty() => Ok(Flow::Normal),
        None => Err(wrong_arg_count(&format!("{class}.init"), 0, args.len())),
    }
}

fn object(state: &RuntimeState, tok: &Token) -> ExecResult<Shared<ClassInstance>> {
    match operand::resolve(state, tok)? {
        Value::Object(instance) => Ok(instance),
        other => Err(type_mismatch("instance", other.type_name())),
    }
}

/// `get_field <instance> <field> [target]`
pub(crate) fn get_field(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "get_field <instance> <field> [target]";
    site.produce(state, 2, "get_field", USAGE, |state, args| {
        let instance = object(state, &args[0])?;
        let field = name(&args[1], "get_field", USAGE)?;
        let instance = instance.read();
        instance
            .fields
            .get(field)
            .cloned()
            .ok_or_else(|| no_such_field(&instance.class, field))
    })
}

/// `set_field <instance> <field> <value>`
pub(crate) fn set_field(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "set_field <instance> <field> <value>";
    site.fixed(state, 3, "set_field", USAGE, |state, args| {
        let instance = object(state, &args[0])?;
        let field = name(&args[1], "set_field", USAGE)?;
        let value = operand::resolve(state, &args[2])?;
        let class = instance.read().class.clone();
        let decl = find_field(state, &class, field).ok_or_else(|| no_such_field(&class, field))?;
        let got = value.type_name();
        let value = decl
            .ty
            .coerce(value)
            .ok_or_else(|| type_mismatch(decl.ty.name(), got))?;
        instance.write().fields.insert(field.to_string(), value);
        Ok(())
    })
}

/// `instanceof <instance> <Class> [target]`: 1 if the instance's class is
/// `Class` or inherits from it.
pub(crate) fn instance_of(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "instanceof <instance> <Class> [target]";
    site.produce(state, 2, "instanceof", USAGE, |state, args| {
        let instance = object(state, &args[0])?;
        let class = name(&args[1], "instanceof", USAGE)?;
        let own = instance.read().class.clone();
        let found = lineage(state, &own).iter().any(|def| def.name == class);
        Ok(Value::Int(i64::from(found)))
    })
}
