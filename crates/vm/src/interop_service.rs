//! Interop service module for the Neo Virtual Machine.
//!
//! SYSCALL looks methods up by name in an [`InteropService`] owned by the
//! engine. A handler reports `Ok(true)` on success; `Ok(false)` or an error
//! faults the engine.

use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::providers::ScriptContainerInterop;
use crate::stack_item::StackItem;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A function that provides interoperability with the host.
pub type InteropMethod = Rc<dyn Fn(&mut ExecutionEngine) -> VmResult<bool>>;

/// Pushes the script container as an interop item.
pub const GET_SCRIPT_CONTAINER: &str = "System.ExecutionEngine.GetScriptContainer";
/// Pushes the hash of the current script.
pub const GET_EXECUTING_SCRIPT_HASH: &str = "System.ExecutionEngine.GetExecutingScriptHash";
/// Pushes the hash of the calling script.
pub const GET_CALLING_SCRIPT_HASH: &str = "System.ExecutionEngine.GetCallingScriptHash";
/// Pushes the hash of the entry script.
pub const GET_ENTRY_SCRIPT_HASH: &str = "System.ExecutionEngine.GetEntryScriptHash";

/// Registry of interop methods.
///
/// `InteropService::default()` carries the execution engine methods;
/// [`InteropService::empty`] carries none.
#[derive(Clone)]
pub struct InteropService {
    /// The registry of interop functions
    methods: HashMap<String, InteropMethod>,
}

impl InteropService {
    /// Creates a registry without any methods.
    pub fn empty() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Creates a registry with the execution engine methods.
    pub fn new() -> Self {
        let mut service = Self::empty();
        service.register_standard_methods();
        service
    }

    /// Registers `handler` under `name`, replacing any previous method.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut ExecutionEngine) -> VmResult<bool> + 'static,
    {
        self.methods.insert(name.into(), Rc::new(handler));
    }

    /// Removes a method. Returns true if it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.methods.remove(name).is_some()
    }

    /// Gets an interop method by name.
    pub fn get_method(&self, name: &str) -> Option<InteropMethod> {
        self.methods.get(name).cloned()
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Invokes the method registered as `name` in the engine's registry.
    pub fn invoke(engine: &mut ExecutionEngine, name: &str) -> VmResult<()> {
        let method = engine
            .interop_service()
            .get_method(name)
            .ok_or_else(|| VmError::UnknownSyscall(name.to_string()))?;
        if method(engine)? {
            Ok(())
        } else {
            Err(VmError::InteropFailed(name.to_string()))
        }
    }

    fn register_standard_methods(&mut self) {
        self.register(GET_SCRIPT_CONTAINER, |engine| {
            match engine.script_container() {
                Some(container) => {
                    let item = StackItem::from_interface(ScriptContainerInterop(container));
                    engine.evaluation_stack_mut().push(item);
                    Ok(true)
                }
                None => {
                    log::warn!("{GET_SCRIPT_CONTAINER} called without a script container");
                    Ok(false)
                }
            }
        });

        self.register(GET_EXECUTING_SCRIPT_HASH, |engine| {
            let hash = engine.current_context().map(|context| context.script_hash());
            push_hash(engine, hash);
            Ok(true)
        });

        self.register(GET_CALLING_SCRIPT_HASH, |engine| {
            let hash = engine.calling_context().map(|context| context.script_hash());
            push_hash(engine, hash);
            Ok(true)
        });

        self.register(GET_ENTRY_SCRIPT_HASH, |engine| {
            let hash = engine.entry_context().map(|context| context.script_hash());
            push_hash(engine, hash);
            Ok(true)
        });
    }
}

impl Default for InteropService {
    fn default() -> Self {
        Self::new()
    }
}

// A missing context pushes an empty byte array.
fn push_hash(engine: &mut ExecutionEngine, hash: Option<[u8; 20]>) {
    let bytes = hash.map(|hash| hash.to_vec()).unwrap_or_default();
    engine.evaluation_stack_mut().push(StackItem::from_bytes(bytes));
}

impl fmt::Debug for InteropService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.methods.keys().collect();
        names.sort();
        f.debug_struct("InteropService")
            .field("methods", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_methods() {
        let service = InteropService::default();
        for name in [
            GET_SCRIPT_CONTAINER,
            GET_EXECUTING_SCRIPT_HASH,
            GET_CALLING_SCRIPT_HASH,
            GET_ENTRY_SCRIPT_HASH,
        ] {
            assert!(service.contains(name), "{name}");
        }
        assert_eq!(service.len(), 4);
        assert!(InteropService::empty().is_empty());
    }

    #[test]
    fn test_register_and_unregister() {
        let mut service = InteropService::empty();
        service.register("Test.Method", |_| Ok(true));
        assert!(service.get_method("Test.Method").is_some());
        assert!(service.unregister("Test.Method"));
        assert!(!service.unregister("Test.Method"));
    }

    #[test]
    fn test_invoke_maps_results() {
        let mut service = InteropService::empty();
        service.register("Test.Push", |engine| {
            engine.push_bool(true)?;
            Ok(true)
        });
        service.register("Test.Refuse", |_| Ok(false));
        let mut engine = ExecutionEngine::new(None, None, service);

        InteropService::invoke(&mut engine, "Test.Push").unwrap();
        assert_eq!(engine.evaluation_stack().count(), 1);
        assert_eq!(
            InteropService::invoke(&mut engine, "Test.Refuse"),
            Err(VmError::InteropFailed("Test.Refuse".into()))
        );
        assert_eq!(
            InteropService::invoke(&mut engine, "Test.Missing"),
            Err(VmError::UnknownSyscall("Test.Missing".into()))
        );
    }
}
