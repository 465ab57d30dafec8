//! Runtime values.
//!
//! Scalars (`Int`, `Float`, `Text`) are copied on assignment. Containers are
//! [`Shared`] handles: assignment copies the handle, so two names can see the
//! same array. [`Value::deep_copy`] breaks that sharing for thread snapshots.

use std::collections::BTreeMap;
use std::fmt;

use tl_ir::Number;

use crate::shared::Shared;

/// Ordered string-keyed map used for dictionaries.
pub type DictMap = BTreeMap<String, Value>;

#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Array(Shared<Vec<Value>>),
    Dict(Shared<DictMap>),
    Struct(Shared<StructInstance>),
    Object(Shared<ClassInstance>),
}

/// Instance of a declared struct type. Fields keep declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct StructInstance {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl StructInstance {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }

    /// Replace an existing field. Returns false if the type has no such field.
    pub fn set(&mut self, field: &str, value: Value) -> bool {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some(slot) => {
                slot.1 = value;
                true
            }
            None => false,
        }
    }
}

/// Instance of a user class.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassInstance {
    pub class: String,
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Shared::new(items))
    }

    pub fn dict(map: DictMap) -> Self {
        Value::Dict(Shared::new(map))
    }

    pub fn from_number(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Struct(_) => "struct",
            Value::Object(_) => "object",
        }
    }

    /// Numbers are truthy when non-zero, text when non-empty, containers
    /// always.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Array(_) | Value::Dict(_) | Value::Struct(_) | Value::Object(_) => true,
        }
    }

    /// Copy with no container shared with `self`. Containers reached twice
    /// are copied once, so cycles survive as cycles.
    #[must_use]
    pub fn deep_copy(&self) -> Value {
        self.copy_into(&mut Vec::new())
    }

    fn copy_into(&self, copies: &mut Vec<(*const (), Value)>) -> Value {
        if let Some(ptr) = self.container_ptr() {
            if let Some((_, copy)) = copies.iter().find(|(seen, _)| *seen == ptr) {
                return copy.clone();
            }
        }
        match self {
            Value::Int(_) | Value::Float(_) | Value::Text(_) => self.clone(),
            Value::Array(items) => {
                let copy = Shared::new(Vec::new());
                copies.push((items.as_ptr(), Value::Array(copy.clone())));
                let filled = items.read().iter().map(|v| v.copy_into(copies)).collect();
                *copy.write() = filled;
                Value::Array(copy)
            }
            Value::Dict(map) => {
                let copy = Shared::new(DictMap::new());
                copies.push((map.as_ptr(), Value::Dict(copy.clone())));
                let filled = map
                    .read()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.copy_into(copies)))
                    .collect();
                *copy.write() = filled;
                Value::Dict(copy)
            }
            Value::Struct(handle) => {
                let inst = handle.read();
                let copy = Shared::new(StructInstance {
                    type_name: inst.type_name.clone(),
                    fields: Vec::new(),
                });
                copies.push((handle.as_ptr(), Value::Struct(copy.clone())));
                let fields = inst
                    .fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.copy_into(copies)))
                    .collect();
                copy.write().fields = fields;
                Value::Struct(copy)
            }
            Value::Object(handle) => {
                let inst = handle.read();
                let copy = Shared::new(ClassInstance {
                    class: inst.class.clone(),
                    fields: BTreeMap::new(),
                });
                copies.push((handle.as_ptr(), Value::Object(copy.clone())));
                let fields = inst
                    .fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.copy_into(copies)))
                    .collect();
                copy.write().fields = fields;
                Value::Object(copy)
            }
        }
    }

    /// Identity of the container behind this value, if it is one.
    fn container_ptr(&self) -> Option<*const ()> {
        match self {
            Value::Int(_) | Value::Float(_) | Value::Text(_) => None,
            Value::Array(items) => Some(items.as_ptr()),
            Value::Dict(map) => Some(map.as_ptr()),
            Value::Struct(inst) => Some(inst.as_ptr()),
            Value::Object(inst) => Some(inst.as_ptr()),
        }
    }

    /// Source-like rendering: text is quoted. Used inside containers and for
    /// stack dumps.
    pub fn repr(&self) -> String {
        Quoted(self).to_string()
    }

    /// Write this value, quoting text when `quoted`. A container already in
    /// `open` is being written further out and renders as an ellipsis.
    fn render(&self, f: &mut fmt::Formatter<'_>, quoted: bool, open: &mut Vec<*const ()>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{}", Number::Float(*x)),
            Value::Text(s) if quoted => write!(f, "{s:?}"),
            Value::Text(s) => f.write_str(s),
            Value::Object(inst) => write!(f, "<{} instance>", inst.read().class),
            Value::Array(items) => {
                if open.contains(&items.as_ptr()) {
                    return f.write_str("[...]");
                }
                open.push(items.as_ptr());
                f.write_str("[")?;
                for (n, item) in items.read().iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }
                    item.render(f, true, open)?;
                }
                open.pop();
                f.write_str("]")
            }
            Value::Dict(map) => {
                if open.contains(&map.as_ptr()) {
                    return f.write_str("{...}");
                }
                open.push(map.as_ptr());
                f.write_str("{")?;
                for (n, (key, value)) in map.read().iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: ")?;
                    value.render(f, true, open)?;
                }
                open.pop();
                f.write_str("}")
            }
            Value::Struct(inst) => {
                if open.contains(&inst.as_ptr()) {
                    return f.write_str("...");
                }
                open.push(inst.as_ptr());
                let inst = inst.read();
                write!(f, "{} {{ ", inst.type_name)?;
                for (n, (name, value)) in inst.fields.iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: ")?;
                    value.render(f, true, open)?;
                }
                open.pop();
                f.write_str(" }")
            }
        }
    }

    /// Structural equality. A pair of containers already being compared
    /// further out counts as equal, so cyclic values terminate.
    fn equals(&self, other: &Value, active: &mut Vec<(*const (), *const ())>) -> bool {
        if let (Some(a), Some(b)) = (self.container_ptr(), other.container_ptr()) {
            if a == b || active.contains(&(a, b)) {
                return true;
            }
            active.push((a, b));
            let equal = self.equals_contents(other, active);
            active.pop();
            return equal;
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_number().map(Number::as_f64) == other.as_number().map(Number::as_f64)
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }

    fn equals_contents(&self, other: &Value, active: &mut Vec<(*const (), *const ())>) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => {
                let (a, b) = (a.read(), b.read());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y, active))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                let (a, b) = (a.read(), b.read());
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.equals(vb, active))
            }
            (Value::Struct(a), Value::Struct(b)) => {
                let (a, b) = (a.read(), b.read());
                a.type_name == b.type_name
                    && a.fields.len() == b.fields.len()
                    && a.fields
                        .iter()
                        .zip(b.fields.iter())
                        .all(|((na, va), (nb, vb))| na == nb && va.equals(vb, active))
            }
            // Objects compare by identity only.
            _ => false,
        }
    }
}

/// [`Value::repr`] as a `Display`.
struct Quoted<'a>(&'a Value);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f, true, &mut Vec::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false, &mut Vec::new())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests;
