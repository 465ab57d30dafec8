//! Variable frames and name resolution.
//!
//! A runtime state holds a stack of [`Frame`]s; frame 0 is the global scope
//! and every function call pushes one. Writes always go to the top frame,
//! so a function can never rebind a caller's variable. Reads walk outward
//! according to each frame's [`Link`]:
//!
//! - `Enclosing`: continue with the frame below (dynamic fallback to the
//!   caller, then globals);
//! - `Captured`: look in the closure's captured snapshot, then stop;
//! - `Module`: look in the defining module's globals, then continue;
//! - `Global`: skip every caller frame and read frame 0 directly.
//!
//! After frame 0, a state's optional parent snapshot is consulted. Nothing
//! ever writes through a link.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::Value;

/// Where a frame's reads go after its own bindings.
#[derive(Clone, Debug, Default)]
pub enum Link {
    #[default]
    Enclosing,
    Captured(Arc<Frame>),
    Module(String),
    Global,
}

/// One scope of variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    bindings: FxHashMap<String, Value>,
    pub(crate) link: Link,
}

impl Frame {
    pub fn new(link: Link) -> Self {
        Frame {
            bindings: FxHashMap::default(),
            link,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings sorted by name, for stable dumps.
    pub fn sorted(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<_> = self.bindings.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Copy with every container deep-copied.
    #[must_use]
    pub fn deep_copy(&self) -> Frame {
        Frame {
            bindings: self
                .bindings
                .iter()
                .map(|(k, v)| (k.clone(), v.deep_copy()))
                .collect(),
            link: match &self.link {
                Link::Captured(frame) => Link::Captured(Arc::new(frame.deep_copy())),
                other => other.clone(),
            },
        }
    }

    /// Insert bindings from `other` that this frame does not define.
    pub(crate) fn fill_from(&mut self, other: &Frame) {
        for (name, value) in &other.bindings {
            self.bindings
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

#[cfg(test)]
mod tests;
