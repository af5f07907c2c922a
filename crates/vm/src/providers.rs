//! Host providers consumed by the execution engine.
//!
//! The engine resolves APPCALL/TAILCALL hashes through a [`ScriptTable`] and
//! reads the signed message for CHECKSIG/CHECKMULTISIG from a
//! [`ScriptContainer`]. Both are optional; an engine without them faults on
//! APPCALL and fails every signature check.

use crate::stack_item::InteropInterface;
use neo_cryptography::{hash160, HASH160_SIZE};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// The object being verified or executed, for example a transaction.
pub trait ScriptContainer: fmt::Debug {
    /// Returns the message that signatures are checked against.
    fn get_message(&self, iteration: u32) -> Option<Vec<u8>>;
}

/// Resolves script hashes to script bytes.
pub trait ScriptTable {
    /// Returns the script whose hash160 is `hash`.
    fn get_script(&self, hash: &[u8]) -> Option<Vec<u8>>;
}

/// Carries the script container on the evaluation stack.
#[derive(Debug, Clone)]
pub struct ScriptContainerInterop(pub Rc<dyn ScriptContainer>);

impl ScriptContainerInterop {
    /// Returns the wrapped container.
    pub fn container(&self) -> &Rc<dyn ScriptContainer> {
        &self.0
    }
}

impl InteropInterface for ScriptContainerInterop {
    fn interface_type(&self) -> &str {
        "ScriptContainer"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn InteropInterface) -> bool {
        other
            .as_any()
            .downcast_ref::<ScriptContainerInterop>()
            .map_or(false, |other| {
                Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
            })
    }
}

/// A container that signs one fixed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContainer {
    message: Vec<u8>,
}

impl MessageContainer {
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ScriptContainer for MessageContainer {
    fn get_message(&self, _iteration: u32) -> Option<Vec<u8>> {
        Some(self.message.clone())
    }
}

/// An in-memory script table keyed by script hash.
#[derive(Debug, Clone, Default)]
pub struct MemoryScriptTable {
    scripts: HashMap<[u8; HASH160_SIZE], Vec<u8>>,
}

impl MemoryScriptTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a script and returns its hash.
    pub fn add(&mut self, script: Vec<u8>) -> [u8; HASH160_SIZE] {
        let hash = hash160(&script);
        self.scripts.insert(hash, script);
        hash
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl ScriptTable for MemoryScriptTable {
    fn get_script(&self, hash: &[u8]) -> Option<Vec<u8>> {
        let hash: [u8; HASH160_SIZE] = hash.try_into().ok()?;
        self.scripts.get(&hash).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_script_table() {
        let mut table = MemoryScriptTable::new();
        let hash = table.add(vec![0x51, 0x66]);

        assert_eq!(table.get_script(&hash), Some(vec![0x51, 0x66]));
        assert_eq!(table.get_script(&[0u8; 20]), None);
        assert_eq!(table.get_script(&hash[..19]), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_container_interop_equality() {
        let container: Rc<dyn ScriptContainer> = Rc::new(MessageContainer::new(b"tx".to_vec()));
        let a = ScriptContainerInterop(Rc::clone(&container));
        let b = ScriptContainerInterop(container);
        let c = ScriptContainerInterop(Rc::new(MessageContainer::new(b"tx".to_vec())));

        assert!(a.equals(&b));
        assert!(!a.equals(&c));
        assert_eq!(a.container().get_message(0), Some(b"tx".to_vec()));
    }
}
