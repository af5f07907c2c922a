//! Map stack item implementation for the Neo Virtual Machine.

use crate::error::{VmError, VmResult};
use crate::stack_item::stack_item::release;
use crate::stack_item::StackItem;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Entries keyed by the byte form of the key; the original key item is kept
/// alongside the value so KEYS returns what was stored.
type Entries = IndexMap<Vec<u8>, (StackItem, StackItem)>;

/// Represents a map of stack items in the VM. Iteration follows insertion
/// order.
#[derive(Clone, Default)]
pub struct Map {
    entries: Rc<RefCell<Entries>>,
}

impl Map {
    /// Creates a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Gets the value for `key`.
    pub fn get(&self, key: &StackItem) -> VmResult<Option<StackItem>> {
        let key = Self::key_bytes(key)?;
        Ok(self.entries.borrow().get(&key).map(|(_, value)| value.clone()))
    }

    /// Inserts or replaces the value for `key`. A replaced entry keeps its position.
    pub fn insert(&self, key: StackItem, value: StackItem) -> VmResult<()> {
        let bytes = Self::key_bytes(&key)?;
        self.entries.borrow_mut().insert(bytes, (key, value));
        Ok(())
    }

    /// Removes `key`, returning its value if present.
    pub fn remove(&self, key: &StackItem) -> VmResult<Option<StackItem>> {
        let key = Self::key_bytes(key)?;
        Ok(self
            .entries
            .borrow_mut()
            .shift_remove(&key)
            .map(|(_, value)| value))
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &StackItem) -> VmResult<bool> {
        let key = Self::key_bytes(key)?;
        Ok(self.entries.borrow().contains_key(&key))
    }

    /// Copies the keys out in insertion order.
    pub fn keys(&self) -> Vec<StackItem> {
        self.entries
            .borrow()
            .values()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Copies the values out in insertion order.
    pub fn values(&self) -> Vec<StackItem> {
        self.entries
            .borrow()
            .values()
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Copies the entries out in insertion order.
    pub fn entries(&self) -> Vec<(StackItem, StackItem)> {
        self.entries.borrow().values().cloned().collect()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Returns true if both values refer to the same map.
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    /// Number of references to the underlying storage.
    pub fn reference_count(&self) -> usize {
        Rc::strong_count(&self.entries)
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.entries) as *const ()
    }

    /// Moves the values into `out` when this is the last reference to them.
    pub(crate) fn take_unique_values(&self, out: &mut Vec<StackItem>) {
        if Rc::strong_count(&self.entries) != 1 {
            return;
        }
        if let Ok(mut entries) = self.entries.try_borrow_mut() {
            out.extend(entries.drain(..).map(|(_, (_, value))| value));
        }
    }

    /// Map keys must be primitive; the lookup key is the byte form.
    fn key_bytes(key: &StackItem) -> VmResult<Vec<u8>> {
        if !key.stack_item_type().is_primitive() {
            return Err(VmError::InvalidKey(key.type_name().to_string()));
        }
        key.as_bytes()
    }
}

impl Drop for Map {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_unique_values(&mut pending);
        release(pending);
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.entries.try_borrow().map(|entries| entries.len()).ok();
        f.debug_struct("Map").field("len", &len).finish()
    }
}
