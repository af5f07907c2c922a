//! Evaluation stack module for the Neo Virtual Machine.
//!
//! [`RandomAccessStack`] is a LIFO stack that can also be addressed by depth,
//! where depth 0 is the top item. The evaluation stack, the alt stack and the
//! invocation stack are all instances of it.

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::stack_item::StackItem;

/// A stack addressable by depth from the top.
#[derive(Debug, Clone)]
pub struct RandomAccessStack<T> {
    /// The underlying stack storage, bottom first
    stack: Vec<T>,
}

/// The stack of values operated on by instructions.
pub type EvaluationStack = RandomAccessStack<StackItem>;

/// The stack of execution contexts; the top is the current context.
pub type InvocationStack = RandomAccessStack<ExecutionContext>;

impl<T> Default for RandomAccessStack<T> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<T> RandomAccessStack<T> {
    /// Creates a new empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items on the stack.
    pub fn count(&self) -> usize {
        self.stack.len()
    }

    /// Returns the number of items on the stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns true if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Fails unless at least `n` items are on the stack.
    pub fn require(&self, n: usize) -> VmResult<()> {
        if self.stack.len() < n {
            return Err(VmError::stack_underflow(n, self.stack.len()));
        }
        Ok(())
    }

    /// Pushes an item onto the stack.
    pub fn push(&mut self, item: T) {
        self.stack.push(item);
    }

    /// Pops the top item, transferring ownership to the caller.
    pub fn pop(&mut self) -> VmResult<T> {
        self.stack
            .pop()
            .ok_or_else(|| VmError::stack_underflow(1, 0))
    }

    /// Returns the item at `depth` without removing it.
    pub fn peek(&self, depth: usize) -> VmResult<&T> {
        let index = self.index_of(depth)?;
        Ok(&self.stack[index])
    }

    /// Returns the item at `depth` mutably without removing it.
    pub fn peek_mut(&mut self, depth: usize) -> VmResult<&mut T> {
        let index = self.index_of(depth)?;
        Ok(&mut self.stack[index])
    }

    /// Returns the top item, if any.
    pub fn top(&self) -> Option<&T> {
        self.stack.last()
    }

    /// Returns the top item mutably, if any.
    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.stack.last_mut()
    }

    /// Returns the bottom item, if any.
    pub fn bottom(&self) -> Option<&T> {
        self.stack.first()
    }

    /// Removes the top `n` items.
    pub fn drop(&mut self, n: usize) -> VmResult<()> {
        self.require(n)?;
        let len = self.stack.len();
        self.stack.truncate(len - n);
        Ok(())
    }

    /// Inserts `item` so that it ends up at `depth`. A depth equal to the
    /// count places it at the bottom.
    pub fn insert(&mut self, depth: usize, item: T) -> VmResult<()> {
        if depth > self.stack.len() {
            return Err(VmError::IndexOutOfRange {
                index: depth as i64,
                count: self.stack.len(),
            });
        }
        let index = self.stack.len() - depth;
        self.stack.insert(index, item);
        Ok(())
    }

    /// Removes and returns the item at `depth`.
    pub fn remove(&mut self, depth: usize) -> VmResult<T> {
        let index = self.index_of(depth)?;
        Ok(self.stack.remove(index))
    }

    /// Replaces the item at `depth`.
    pub fn set(&mut self, depth: usize, item: T) -> VmResult<()> {
        let index = self.index_of(depth)?;
        self.stack[index] = item;
        Ok(())
    }

    /// Swaps the items at two depths.
    pub fn swap(&mut self, a: usize, b: usize) -> VmResult<()> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.stack.swap(a, b);
        Ok(())
    }

    /// Clears the stack.
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Iterates from the bottom of the stack to the top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.stack.iter()
    }

    fn index_of(&self, depth: usize) -> VmResult<usize> {
        if depth >= self.stack.len() {
            return Err(VmError::IndexOutOfRange {
                index: depth as i64,
                count: self.stack.len(),
            });
        }
        Ok(self.stack.len() - 1 - depth)
    }
}

impl<T: Clone> RandomAccessStack<T> {
    /// Copies the top `count` items to another stack, keeping their order.
    pub fn copy_to(&self, target: &mut RandomAccessStack<T>, count: usize) -> VmResult<()> {
        self.require(count)?;
        let start = self.stack.len() - count;
        target.stack.extend_from_slice(&self.stack[start..]);
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a RandomAccessStack<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.stack.iter()
    }
}
