//! Thread bookkeeping and the explicitly shared resource.
//!
//! Spawned threads own a deep copy of the spawning state; nothing they do is
//! visible to the parent except their output, collected on join. The one
//! thing shared on purpose is [`SharedResources`]: named locks that scripts
//! use to serialise access to external resources.

use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;

use crate::output::OutputLog;

pub(crate) enum ThreadSlot {
    Running(JoinHandle<OutputLog>),
    /// Joined; keeps the output for repeated joins.
    Finished(OutputLog),
}

/// Threads spawned by one runtime state.
#[derive(Default)]
pub struct ThreadTable {
    pub(crate) next_id: i64,
    pub(crate) slots: FxHashMap<i64, ThreadSlot>,
}

impl ThreadTable {
    pub(crate) fn insert(&mut self, handle: JoinHandle<OutputLog>) -> i64 {
        self.next_id += 1;
        self.slots.insert(self.next_id, ThreadSlot::Running(handle));
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl std::fmt::Debug for ThreadTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadTable")
            .field("next_id", &self.next_id)
            .field("threads", &self.slots.len())
            .finish()
    }
}

/// Named locks shared by a state and every thread spawned from it.
#[derive(Debug, Default)]
pub struct SharedResources {
    /// Lock name → held.
    locks: Mutex<FxHashMap<String, bool>>,
    released: Condvar,
}

impl SharedResources {
    pub fn create_lock(&self, name: &str) {
        self.locks.lock().entry(name.to_string()).or_insert(false);
    }

    /// Block until `name` is free, then hold it. False if no such lock.
    pub fn lock(&self, name: &str) -> bool {
        let mut locks = self.locks.lock();
        loop {
            match locks.get(name).copied() {
                None => return false,
                Some(false) => {
                    locks.insert(name.to_string(), true);
                    return true;
                }
                Some(true) => self.released.wait(&mut locks),
            }
        }
    }

    /// Release `name`. False if no such lock.
    pub fn unlock(&self, name: &str) -> bool {
        let mut locks = self.locks.lock();
        let Some(held) = locks.get_mut(name) else {
            return false;
        };
        *held = false;
        self.released.notify_all();
        true
    }
}
