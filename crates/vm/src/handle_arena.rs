//! Generation-checked handles for host embedders.
//!
//! Hosts that need to refer to VM values from outside Rust, for example
//! across an FFI boundary, store them here and pass the [`Handle`] around.
//! A freed slot is reused with a new generation, so an old handle to it
//! fails with [`HandleError::Stale`] instead of reaching the new value.

use thiserror::Error;

/// Errors raised by [`HandleArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandleError {
    /// The handle was freed, or never came from this arena.
    #[error("Stale handle {index}:{generation}")]
    Stale { index: u32, generation: u32 },
}

/// A reference to a value in a [`HandleArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage addressed by generation-checked handles.
#[derive(Debug)]
pub struct HandleArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> HandleArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no value is live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` and returns its handle.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle {
            index,
            generation: 0,
        }
    }

    /// Returns the value behind `handle`.
    pub fn get(&self, handle: Handle) -> Result<&T, HandleError> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
            .ok_or(Self::stale(handle))
    }

    /// Returns the value behind `handle` (mutable).
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut T, HandleError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
            .ok_or(Self::stale(handle))
    }

    /// Removes and returns the value behind `handle`. Every copy of the
    /// handle is stale afterwards.
    pub fn free(&mut self, handle: Handle) -> Result<T, HandleError> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(Self::stale(handle))?;
        let value = slot.value.take().ok_or(Self::stale(handle))?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Ok(value)
    }

    fn stale(handle: Handle) -> HandleError {
        HandleError::Stale {
            index: handle.index,
            generation: handle.generation,
        }
    }
}

impl<T> Default for HandleArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
