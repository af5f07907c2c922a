//! APPCALL and TAILCALL tests against an in-memory script table.

use neo_legacy_vm::{
    ExecutionEngine, InteropService, MemoryScriptTable, OpCode, ScriptBuilder, StackItem,
    VMState, VmError,
};
use std::rc::Rc;

fn engine_with(table: MemoryScriptTable) -> ExecutionEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    ExecutionEngine::new(None, Some(Rc::new(table)), InteropService::new())
}

fn callee() -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    builder.emit_push_int(42).emit(OpCode::RET);
    builder.to_vec()
}

/// APPCALL runs the callee and returns to the caller.
#[test]
fn test_appcall_returns_to_caller() {
    let mut table = MemoryScriptTable::new();
    let hash = table.add(callee());

    let mut builder = ScriptBuilder::new();
    builder.emit_app_call(&hash, false).emit_push_int(1);

    let mut engine = engine_with(table);
    engine.load_script(builder.to_vec()).unwrap();

    assert_eq!(engine.step_into(), VMState::NONE);
    assert_eq!(engine.invocation_stack().count(), 2);

    assert_eq!(engine.execute(), VMState::HALT);
    let stack = engine.evaluation_stack();
    assert_eq!(stack.peek(0).unwrap(), &StackItem::from_int(1));
    assert_eq!(stack.peek(1).unwrap(), &StackItem::from_int(42));
}

/// TAILCALL replaces the caller, so code after it never runs.
#[test]
fn test_tailcall_replaces_caller() {
    let mut table = MemoryScriptTable::new();
    let hash = table.add(callee());

    let mut builder = ScriptBuilder::new();
    builder.emit_app_call(&hash, true).emit_push_int(1);

    let mut engine = engine_with(table);
    engine.load_script(builder.to_vec()).unwrap();

    assert_eq!(engine.step_into(), VMState::NONE);
    assert_eq!(engine.invocation_stack().count(), 1);
    assert_eq!(engine.current_context().unwrap().script_hash(), hash);

    assert_eq!(engine.execute(), VMState::HALT);
    assert_eq!(engine.evaluation_stack().count(), 1);
    assert_eq!(engine.evaluation_stack().peek(0).unwrap(), &StackItem::from_int(42));
}

/// A zero hash operand takes the hash from the stack.
#[test]
fn test_dynamic_appcall() {
    let mut table = MemoryScriptTable::new();
    let hash = table.add(callee());

    let mut builder = ScriptBuilder::new();
    builder.emit_push_bytes(&hash).emit_app_call(&[0; 20], false);

    let mut engine = engine_with(table);
    engine.load_script(builder.to_vec()).unwrap();
    assert_eq!(engine.execute(), VMState::HALT);
    assert_eq!(engine.evaluation_stack().peek(0).unwrap(), &StackItem::from_int(42));
}

/// A zero hash with an empty stack, or an unresolved hash, faults.
#[test]
fn test_appcall_failures() {
    let mut builder = ScriptBuilder::new();
    builder.emit_app_call(&[0; 20], false);
    let mut engine = engine_with(MemoryScriptTable::new());
    engine.load_script(builder.to_vec()).unwrap();
    assert_eq!(engine.execute(), VMState::FAULT);
    assert!(matches!(engine.fault_reason(), Some(VmError::StackUnderflow { .. })));

    let mut builder = ScriptBuilder::new();
    builder.emit_app_call(&[0x11; 20], false);
    let mut engine = engine_with(MemoryScriptTable::new());
    engine.load_script(builder.to_vec()).unwrap();
    assert_eq!(engine.execute(), VMState::FAULT);
    assert_eq!(
        engine.fault_reason(),
        Some(&VmError::ScriptNotFound("11".repeat(20)))
    );
}

/// Calling and entry script hashes follow the invocation stack.
#[test]
fn test_script_hash_syscalls_across_appcall() {
    let mut callee_builder = ScriptBuilder::new();
    callee_builder
        .emit_syscall("System.ExecutionEngine.GetExecutingScriptHash")
        .unwrap()
        .emit_syscall("System.ExecutionEngine.GetCallingScriptHash")
        .unwrap()
        .emit_syscall("System.ExecutionEngine.GetEntryScriptHash")
        .unwrap();

    let mut table = MemoryScriptTable::new();
    let callee_hash = table.add(callee_builder.to_vec());

    let mut builder = ScriptBuilder::new();
    builder.emit_app_call(&callee_hash, false);
    let caller = builder.to_vec();
    let caller_hash = neo_cryptography::hash160(&caller);

    let mut engine = engine_with(table);
    engine.load_script(caller).unwrap();
    assert_eq!(engine.execute(), VMState::HALT);

    let stack = engine.evaluation_stack();
    assert_eq!(stack.peek(0).unwrap(), &StackItem::from_bytes(caller_hash.to_vec()));
    assert_eq!(stack.peek(1).unwrap(), &StackItem::from_bytes(caller_hash.to_vec()));
    assert_eq!(stack.peek(2).unwrap(), &StackItem::from_bytes(callee_hash.to_vec()));
}
