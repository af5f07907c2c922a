//! Array and struct stack item implementation for the Neo Virtual Machine.
//!
//! Arrays and structs share one representation. An array is compared by
//! reference; a struct is compared by value and copied when stored into a
//! container.

use crate::stack_item::stack_item::release;
use crate::stack_item::StackItem;
use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Represents an array (or struct) of stack items in the VM.
#[derive(Clone)]
pub struct Array {
    /// The items in the array, shared by every reference to it.
    items: Rc<RefCell<Vec<StackItem>>>,

    /// Set for containers created as structs.
    is_struct: bool,
}

impl Array {
    /// Creates a new array or struct with the specified items.
    pub fn new(items: Vec<StackItem>, is_struct: bool) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
            is_struct,
        }
    }

    /// Creates a new array.
    pub fn new_array(items: Vec<StackItem>) -> Self {
        Self::new(items, false)
    }

    /// Creates a new struct.
    pub fn new_struct(items: Vec<StackItem>) -> Self {
        Self::new(items, true)
    }

    /// Returns true if this container is a struct.
    pub fn is_struct(&self) -> bool {
        self.is_struct
    }

    /// Gets the number of items in the array.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Returns true if the array is empty.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Borrows the items in the array.
    pub fn items(&self) -> Ref<'_, Vec<StackItem>> {
        self.items.borrow()
    }

    /// Copies the item references out of the array.
    pub fn to_vec(&self) -> Vec<StackItem> {
        self.items.borrow().clone()
    }

    /// Gets the item at the specified index.
    pub fn get(&self, index: usize) -> Option<StackItem> {
        self.items.borrow().get(index).cloned()
    }

    /// Replaces the item at `index`. Returns false when the index is out of range.
    pub fn set(&self, index: usize, item: StackItem) -> bool {
        match self.items.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Adds an item to the end of the array.
    pub fn push(&self, item: StackItem) {
        self.items.borrow_mut().push(item);
    }

    /// Removes the item at the specified index.
    pub fn remove(&self, index: usize) -> Option<StackItem> {
        let mut items = self.items.borrow_mut();
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// Reverses the items in place.
    pub fn reverse(&self) {
        self.items.borrow_mut().reverse();
    }

    /// Removes all items from the array.
    pub fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    /// Returns true if both values refer to the same container.
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    /// Creates a new container of the requested kind holding the same item
    /// references.
    pub fn to_kind(&self, is_struct: bool) -> Self {
        Self::new(self.to_vec(), is_struct)
    }

    /// Copies a struct for storage. Nested structs are copied as well;
    /// every other item keeps its reference.
    pub fn clone_struct(&self) -> Self {
        let root = Self::new_struct(Vec::new());
        let mut pending = vec![(self.clone(), root.clone())];
        while let Some((source, copy)) = pending.pop() {
            let items: Vec<StackItem> = source
                .items()
                .iter()
                .map(|item| match item {
                    StackItem::Array(inner) if inner.is_struct() => {
                        let inner_copy = Self::new_struct(Vec::new());
                        pending.push((inner.clone(), inner_copy.clone()));
                        StackItem::Array(inner_copy)
                    }
                    other => other.clone(),
                })
                .collect();
            *copy.items.borrow_mut() = items;
        }
        root
    }

    /// Structural equality between two structs.
    pub(crate) fn struct_equals(&self, other: &Array) -> bool {
        let mut compared = HashSet::new();
        let mut pending = vec![(self.clone(), other.clone())];
        while let Some((left, right)) = pending.pop() {
            if left.ptr_eq(&right) || !compared.insert((left.as_ptr(), right.as_ptr())) {
                continue;
            }
            let left_items = left.items();
            let right_items = right.items();
            if left_items.len() != right_items.len() {
                return false;
            }
            for (a, b) in left_items.iter().zip(right_items.iter()) {
                match (a, b) {
                    (StackItem::Array(x), StackItem::Array(y)) if x.is_struct() && y.is_struct() => {
                        pending.push((x.clone(), y.clone()));
                    }
                    _ if !a.equals(b) => return false,
                    _ => {}
                }
            }
        }
        true
    }

    /// Moves the items into `out` when this is the last reference to them.
    pub(crate) fn take_unique_items(&self, out: &mut Vec<StackItem>) {
        if Rc::strong_count(&self.items) != 1 {
            return;
        }
        if let Ok(mut items) = self.items.try_borrow_mut() {
            out.append(&mut items);
        }
    }

    /// Number of references to the underlying storage.
    pub fn reference_count(&self) -> usize {
        Rc::strong_count(&self.items)
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.items) as *const ()
    }
}

impl Drop for Array {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_unique_items(&mut pending);
        release(pending);
    }
}

impl fmt::Debug for Array {
    // Containers may be cyclic; only the shape is printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.items.try_borrow().map(|items| items.len()).ok();
        f.debug_struct(if self.is_struct { "Struct" } else { "Array" })
            .field("len", &len)
            .finish()
    }
}
