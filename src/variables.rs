//! Host variable storage.
//!
//! The topic table lives in one cell of a host-owned key-value store.
//! [`VariableStore`] is the only interface the state machine needs from
//! it; [`MemoryVariables`] is an in-process implementation.

use crate::types::VariableId;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Key-value variable storage provided by the host.
pub trait VariableStore {
    /// Read a variable. `None` if it was never written.
    fn read(&self, id: VariableId) -> Option<Value>;

    /// Replace a variable's value.
    fn write(&self, id: VariableId, value: Value);
}

impl<T: VariableStore + ?Sized> VariableStore for &T {
    fn read(&self, id: VariableId) -> Option<Value> {
        (**self).read(id)
    }

    fn write(&self, id: VariableId, value: Value) {
        (**self).write(id, value)
    }
}

impl<T: VariableStore + ?Sized> VariableStore for Arc<T> {
    fn read(&self, id: VariableId) -> Option<Value> {
        (**self).read(id)
    }

    fn write(&self, id: VariableId, value: Value) {
        (**self).write(id, value)
    }
}

/// In-memory variable storage.
#[derive(Default)]
pub struct MemoryVariables {
    values: RwLock<HashMap<VariableId, Value>>,
    /// Number of writes since creation.
    writes: AtomicU64,
}

impl MemoryVariables {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Remove a variable, returning its previous value.
    pub fn clear(&self, id: VariableId) -> Option<Value> {
        self.values.write().remove(&id)
    }

    /// Copy of every variable.
    pub fn snapshot(&self) -> HashMap<VariableId, Value> {
        self.values.read().clone()
    }

    /// Replace every variable with a previously taken snapshot.
    pub fn restore(&self, snapshot: HashMap<VariableId, Value>) {
        *self.values.write() = snapshot;
    }
}

impl VariableStore for MemoryVariables {
    fn read(&self, id: VariableId) -> Option<Value> {
        self.values.read().get(&id).cloned()
    }

    fn write(&self, id: VariableId, value: Value) {
        self.values.write().insert(id, value);
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}
