//! Interop service tests
//!
//! Host methods registered on the engine and reached through SYSCALL.

use neo_legacy_vm::{
    ExecutionEngine, HandleArena, InteropInterface, InteropService, MessageContainer,
    ScriptBuilder, ScriptContainer, ScriptContainerInterop, StackItem, VMState, VmError,
};
use std::any::Any;
use std::cell::Cell;
use std::rc::{Rc, Weak};

#[derive(Debug)]
struct HostObject {
    payload: Rc<u32>,
}

impl InteropInterface for HostObject {
    fn interface_type(&self) -> &str {
        "HostObject"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn syscall_script(names: &[&str]) -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    for name in names {
        builder.emit_syscall(name).unwrap();
    }
    builder.to_vec()
}

/// A registered method runs with access to the engine.
#[test]
fn test_custom_method() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();

    let mut service = InteropService::new();
    service.register("Test.Push", move |engine| {
        counter.set(counter.get() + 1);
        engine.push(StackItem::from_int(99))?;
        Ok(true)
    });

    let mut engine = ExecutionEngine::new(None, None, service);
    engine.load_script(syscall_script(&["Test.Push", "Test.Push"])).unwrap();
    assert_eq!(engine.execute(), VMState::HALT);
    assert_eq!(calls.get(), 2);
    assert_eq!(engine.evaluation_stack().count(), 2);
}

/// A method reporting failure faults the engine.
#[test]
fn test_failing_method_faults() {
    let mut service = InteropService::empty();
    service.register("Test.Fail", |_| Ok(false));
    service.register("Test.Err", |_| Err(VmError::invalid_operation_msg("host error")));

    let mut engine = ExecutionEngine::new(None, None, service.clone());
    engine.load_script(syscall_script(&["Test.Fail"])).unwrap();
    assert_eq!(engine.execute(), VMState::FAULT);
    assert_eq!(engine.fault_reason(), Some(&VmError::InteropFailed("Test.Fail".into())));

    let mut engine = ExecutionEngine::new(None, None, service);
    engine.load_script(syscall_script(&["Test.Err"])).unwrap();
    assert_eq!(engine.execute(), VMState::FAULT);
    assert!(matches!(engine.fault_reason(), Some(VmError::InvalidOperation(_))));
}

/// GetScriptContainer pushes the container the engine was built with.
#[test]
fn test_get_script_container() {
    let container = Rc::new(MessageContainer::new(b"tx".to_vec()));
    let mut engine = ExecutionEngine::new(Some(container), None, InteropService::new());
    engine
        .load_script(syscall_script(&["System.ExecutionEngine.GetScriptContainer"]))
        .unwrap();
    assert_eq!(engine.execute(), VMState::HALT);

    let item = engine.evaluation_stack().peek(0).unwrap();
    let interop = item.as_interface::<ScriptContainerInterop>().expect("container");
    assert_eq!(interop.container().get_message(0), Some(b"tx".to_vec()));

    let mut engine = ExecutionEngine::default();
    engine
        .load_script(syscall_script(&["System.ExecutionEngine.GetScriptContainer"]))
        .unwrap();
    assert_eq!(engine.execute(), VMState::FAULT);
}

/// Interop payloads live exactly as long as something references them.
#[test]
fn test_interop_item_liveness() {
    let payload = Rc::new(7u32);
    let weak: Weak<u32> = Rc::downgrade(&payload);

    let mut engine = ExecutionEngine::default();
    engine
        .push(StackItem::from_interface(HostObject { payload }))
        .unwrap();
    // DUP PUSH1 PACK
    engine.load_script(vec![0x76, 0x51, 0xC1]).unwrap();
    assert_eq!(engine.execute(), VMState::HALT);
    assert!(weak.upgrade().is_some());

    let packed = engine.evaluation_stack_mut().pop().unwrap();
    assert!(weak.upgrade().is_some());
    let item = engine.evaluation_stack_mut().pop().unwrap();
    let host = item.as_interface::<HostObject>().unwrap();
    assert_eq!(*host.payload, 7);

    drop(item);
    assert!(weak.upgrade().is_some());
    drop(packed);
    assert!(weak.upgrade().is_none());
}

/// Handles held by the host do not outlive a free, but the item does while
/// the engine still holds it.
#[test]
fn test_handle_arena_with_engine_items() {
    let mut arena = HandleArena::new();
    let array = StackItem::from_array(vec![StackItem::from_int(1)]);
    let handle = arena.insert(array.clone());

    let mut engine = ExecutionEngine::default();
    engine.push(array).unwrap();
    arena.free(handle).unwrap();

    assert!(arena.free(handle).is_err());
    assert!(arena.get(handle).is_err());

    engine.load_script(vec![0xC0]).unwrap();
    assert_eq!(engine.execute(), VMState::HALT);
    assert_eq!(engine.evaluation_stack().peek(0).unwrap(), &StackItem::from_int(1));
}
