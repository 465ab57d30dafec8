//! Definitions held in runtime registries.

use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::environment::{Frame, Link};
use crate::program::Body;
use crate::{DictMap, Value};

/// A user function, method or closure.
#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Body,
    /// Read fallback for the frame a call pushes.
    pub scope: Link,
}

impl FunctionDef {
    /// Same function, reading through `scope` instead.
    #[must_use]
    pub fn rescoped(&self, scope: Link) -> FunctionDef {
        FunctionDef {
            scope,
            ..self.clone()
        }
    }

    /// Copy whose captured snapshot, if any, shares no container with this
    /// one.
    #[must_use]
    pub fn deep_copy(&self) -> FunctionDef {
        match &self.scope {
            Link::Captured(frame) => self.rescoped(Link::Captured(Arc::new(frame.deep_copy()))),
            Link::Enclosing | Link::Module(_) | Link::Global => self.clone(),
        }
    }
}

/// Declared type of a struct or class field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Float,
    Str,
    Array,
    Dict,
}

impl FieldType {
    pub fn parse(name: &str) -> Option<FieldType> {
        Some(match name {
            "int" | "number" => FieldType::Int,
            "float" => FieldType::Float,
            "str" | "string" => FieldType::Str,
            "array" | "list" => FieldType::Array,
            "dict" | "map" => FieldType::Dict,
            _ => return None,
        })
    }

    pub fn default_value(self) -> Value {
        match self {
            FieldType::Int => Value::Int(0),
            FieldType::Float => Value::Float(0.0),
            FieldType::Str => Value::text(""),
            FieldType::Array => Value::array(Vec::new()),
            FieldType::Dict => Value::dict(DictMap::new()),
        }
    }

    /// `value` converted for a field of this type, or `None` if it does not
    /// fit. Integers widen to floats.
    pub fn coerce(self, value: Value) -> Option<Value> {
        match (self, value) {
            (FieldType::Int, v @ Value::Int(_))
            | (FieldType::Float, v @ Value::Float(_))
            | (FieldType::Str, v @ Value::Text(_))
            | (FieldType::Array, v @ Value::Array(_))
            | (FieldType::Dict, v @ Value::Dict(_)) => Some(v),
            (FieldType::Float, Value::Int(n)) => Some(Value::Float(n as f64)),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Str => "str",
            FieldType::Array => "array",
            FieldType::Dict => "dict",
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: String,
    pub ty: FieldType,
    pub default: Option<Value>,
}

impl FieldDecl {
    /// Initial value for a new instance. Containers are never shared between
    /// instances.
    pub fn initial_value(&self) -> Value {
        match &self.default {
            Some(value) => value.deep_copy(),
            None => self.ty.default_value(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClassDef {
    pub name: String,
    pub parent: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: FxHashMap<String, Arc<FunctionDef>>,
    pub statics: FxHashMap<String, Arc<FunctionDef>>,
    pub init: Option<Arc<FunctionDef>>,
}

#[derive(Clone, Debug)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<(String, FieldType)>,
}

/// A loaded module.
///
/// After loading, the child state is reduced to what callers can reach: its
/// globals (read fallback for its functions) and its function table.
#[derive(Clone, Debug)]
pub struct ModuleRecord {
    pub path: PathBuf,
    pub globals: Arc<Frame>,
    pub functions: FxHashMap<String, Arc<FunctionDef>>,
    pub exports: Vec<String>,
}

impl ModuleRecord {
    #[must_use]
    pub fn deep_copy(&self) -> ModuleRecord {
        ModuleRecord {
            globals: Arc::new(self.globals.deep_copy()),
            ..self.clone()
        }
    }
}
