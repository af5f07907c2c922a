//! Execution engine module for the Neo Virtual Machine.
//!
//! This module provides the execution engine implementation for the Neo VM.
//! The engine owns a single evaluation stack and alt stack shared by every
//! context on the invocation stack.

use crate::big_integer;
use crate::error::{VmError, VmResult};
use crate::evaluation_stack::{EvaluationStack, InvocationStack};
use crate::execution_context::ExecutionContext;
use crate::interop_service::InteropService;
use crate::jump_table;
use crate::limits::ExecutionEngineLimits;
use crate::op_code::OpCode;
use crate::providers::{ScriptContainer, ScriptTable};
use crate::stack_item::{self, StackItem};
use crate::vm_state::VMState;
use num_bigint::BigInt;
use std::rc::Rc;

/// The execution engine for the Neo VM.
pub struct ExecutionEngine {
    /// The current state of the VM
    state: VMState,

    /// Restrictions on the VM
    limits: ExecutionEngineLimits,

    /// The invocation stack of the VM
    invocation_stack: InvocationStack,

    /// The stack operated on by instructions
    evaluation_stack: EvaluationStack,

    /// Auxiliary stack for TOALTSTACK and friends
    alt_stack: EvaluationStack,

    /// Supplies the message for signature checks
    script_container: Option<Rc<dyn ScriptContainer>>,

    /// Resolves APPCALL and TAILCALL hashes
    script_table: Option<Rc<dyn ScriptTable>>,

    /// Methods reachable through SYSCALL
    interop_service: InteropService,

    /// The error that moved the engine to FAULT
    fault_reason: Option<VmError>,
}

impl ExecutionEngine {
    /// Creates a new execution engine with the default limits.
    pub fn new(
        script_container: Option<Rc<dyn ScriptContainer>>,
        script_table: Option<Rc<dyn ScriptTable>>,
        interop_service: InteropService,
    ) -> Self {
        Self::new_with_limits(
            script_container,
            script_table,
            interop_service,
            ExecutionEngineLimits::default(),
        )
    }

    /// Creates a new execution engine with the specified limits.
    pub fn new_with_limits(
        script_container: Option<Rc<dyn ScriptContainer>>,
        script_table: Option<Rc<dyn ScriptTable>>,
        interop_service: InteropService,
        limits: ExecutionEngineLimits,
    ) -> Self {
        Self {
            state: VMState::NONE,
            limits,
            invocation_stack: InvocationStack::new(),
            evaluation_stack: EvaluationStack::new(),
            alt_stack: EvaluationStack::new(),
            script_container,
            script_table,
            interop_service,
            fault_reason: None,
        }
    }

    /// Returns the current state of the VM.
    pub fn state(&self) -> VMState {
        self.state
    }

    /// Returns the error that faulted the engine, if any.
    pub fn fault_reason(&self) -> Option<&VmError> {
        self.fault_reason.as_ref()
    }

    /// Returns the limits of this engine.
    pub fn limits(&self) -> &ExecutionEngineLimits {
        &self.limits
    }

    /// Returns the invocation stack.
    pub fn invocation_stack(&self) -> &InvocationStack {
        &self.invocation_stack
    }

    /// Returns the evaluation stack.
    pub fn evaluation_stack(&self) -> &EvaluationStack {
        &self.evaluation_stack
    }

    /// Returns the evaluation stack (mutable).
    pub fn evaluation_stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.evaluation_stack
    }

    /// Returns the alt stack.
    pub fn alt_stack(&self) -> &EvaluationStack {
        &self.alt_stack
    }

    /// Returns the alt stack (mutable).
    pub fn alt_stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.alt_stack
    }

    /// Returns the current context, if any.
    pub fn current_context(&self) -> Option<&ExecutionContext> {
        self.invocation_stack.top()
    }

    /// Returns the current context (mutable), if any.
    pub fn current_context_mut(&mut self) -> Option<&mut ExecutionContext> {
        self.invocation_stack.top_mut()
    }

    /// Returns the context below the current one, if any.
    pub fn calling_context(&self) -> Option<&ExecutionContext> {
        self.invocation_stack.peek(1).ok()
    }

    /// Returns the entry context, if any.
    pub fn entry_context(&self) -> Option<&ExecutionContext> {
        self.invocation_stack.bottom()
    }

    /// Returns the script container.
    pub fn script_container(&self) -> Option<Rc<dyn ScriptContainer>> {
        self.script_container.clone()
    }

    /// Returns the script table.
    pub fn script_table(&self) -> Option<Rc<dyn ScriptTable>> {
        self.script_table.clone()
    }

    /// Returns the interop service.
    pub fn interop_service(&self) -> &InteropService {
        &self.interop_service
    }

    /// Returns the interop service (mutable).
    pub fn interop_service_mut(&mut self) -> &mut InteropService {
        &mut self.interop_service
    }

    /// Loads a script as a new context on top of the invocation stack.
    pub fn load_script(&mut self, script: impl Into<Rc<[u8]>>) -> VmResult<()> {
        self.load_context(ExecutionContext::new(script.into(), false))
    }

    /// Loads a script that may only contain push instructions.
    pub fn load_push_only_script(&mut self, script: impl Into<Rc<[u8]>>) -> VmResult<()> {
        self.load_context(ExecutionContext::new(script.into(), true))
    }

    /// Pushes a context, enforcing the invocation depth limit.
    pub fn load_context(&mut self, context: ExecutionContext) -> VmResult<()> {
        let depth = self.invocation_stack.count();
        if depth >= self.limits.max_invocation_stack_size {
            return Err(VmError::InvocationStackOverflow {
                depth: depth + 1,
                limit: self.limits.max_invocation_stack_size,
            });
        }
        self.invocation_stack.push(context);
        Ok(())
    }

    /// Removes the current context and returns it to the caller.
    pub(crate) fn unload_context(&mut self) -> VmResult<ExecutionContext> {
        let context = self.invocation_stack.pop()?;
        if self.invocation_stack.is_empty() {
            self.state = VMState::HALT;
        }
        Ok(context)
    }

    /// Replaces the current context with `context` without changing depth.
    pub(crate) fn replace_context(&mut self, context: ExecutionContext) -> VmResult<()> {
        self.invocation_stack.pop()?;
        self.invocation_stack.push(context);
        Ok(())
    }

    /// Runs until the engine halts or faults.
    pub fn execute(&mut self) -> VMState {
        while self.state.is_none() {
            self.step_into();
        }
        self.state
    }

    /// Executes one instruction.
    pub fn step_into(&mut self) -> VMState {
        if self.state.is_terminal() {
            return self.state;
        }
        if let Err(err) = self.execute_next() {
            self.on_fault(err);
        }
        self.state
    }

    /// Executes one instruction, and continues through any contexts it
    /// entered until control is back at the starting depth.
    pub fn step_over(&mut self) -> VMState {
        if self.state.is_terminal() {
            return self.state;
        }
        let depth = self.invocation_stack.count();
        loop {
            self.step_into();
            if self.state.is_terminal() || self.invocation_stack.count() <= depth {
                break;
            }
        }
        self.state
    }

    /// Executes until the current context returns.
    pub fn step_out(&mut self) -> VMState {
        let depth = self.invocation_stack.count();
        while self.state.is_none() && self.invocation_stack.count() >= depth {
            self.step_into();
        }
        self.state
    }

    fn execute_next(&mut self) -> VmResult<()> {
        let context = match self.invocation_stack.top() {
            Some(context) => context,
            None => {
                self.state = VMState::HALT;
                return Ok(());
            }
        };

        if context.at_end() {
            log::trace!("implicit RET at {}", context.instruction_pointer());
            self.unload_context()?;
            return Ok(());
        }

        let instruction = context.current_instruction()?;
        let opcode = instruction.opcode();
        if context.is_push_only() && !opcode.is_push() && opcode != OpCode::RET {
            return Err(VmError::PushOnlyViolation { opcode });
        }

        let next = instruction.pointer + instruction.size();
        if let Some(context) = self.invocation_stack.top_mut() {
            context.set_instruction_pointer(next);
        }

        log::trace!(
            "{:?} at {} (depth {})",
            opcode,
            instruction.pointer,
            self.invocation_stack.count()
        );
        jump_table::execute(self, &instruction)?;
        self.check_stack_size()
    }

    /// Items nested in containers count toward the limit as well.
    fn check_stack_size(&self) -> VmResult<()> {
        let size = stack_item::count_items(
            self.evaluation_stack.iter().chain(self.alt_stack.iter()),
            self.limits.max_stack_size,
        );
        if size > self.limits.max_stack_size {
            return Err(VmError::StackOverflow {
                size,
                limit: self.limits.max_stack_size,
            });
        }
        Ok(())
    }

    /// Called when an error causes the VM to enter the FAULT state.
    fn on_fault(&mut self, err: VmError) {
        log::debug!("VM fault: {err}");
        self.fault_reason = Some(err);
        self.state = VMState::FAULT;
    }

    /// Pushes an item onto the evaluation stack, enforcing the item size limit.
    pub fn push(&mut self, item: StackItem) -> VmResult<()> {
        if let StackItem::ByteArray(bytes) = &item {
            self.limits.check_item_size(bytes.len())?;
        }
        self.evaluation_stack.push(item);
        Ok(())
    }

    /// Pushes a boolean.
    pub fn push_bool(&mut self, value: bool) -> VmResult<()> {
        self.push(StackItem::Boolean(value))
    }

    /// Pushes an integer, enforcing the integer size limit.
    pub fn push_int(&mut self, value: BigInt) -> VmResult<()> {
        big_integer::check_size(&value, self.limits.max_integer_size)?;
        self.push(StackItem::Integer(value))
    }

    /// Pops the top of the evaluation stack.
    pub fn pop(&mut self) -> VmResult<StackItem> {
        self.evaluation_stack.pop()
    }

    /// Returns the item at `depth` on the evaluation stack.
    pub fn peek(&self, depth: usize) -> VmResult<&StackItem> {
        self.evaluation_stack.peek(depth)
    }

    /// Converts the item at `depth` to an integer, enforcing the integer size
    /// limit.
    pub fn peek_int(&self, depth: usize) -> VmResult<BigInt> {
        let value = self.peek(depth)?.as_int()?;
        big_integer::check_size(&value, self.limits.max_integer_size)?;
        Ok(value)
    }

    /// Converts the item at `depth` to a byte array.
    pub fn peek_bytes(&self, depth: usize) -> VmResult<Vec<u8>> {
        self.peek(depth)?.as_bytes()
    }

    /// Converts the item at `depth` to a boolean.
    pub fn peek_bool(&self, depth: usize) -> VmResult<bool> {
        Ok(self.peek(depth)?.as_bool())
    }

    /// Pops the top item as an integer. The stack is left untouched when the
    /// conversion fails.
    pub fn pop_int(&mut self) -> VmResult<BigInt> {
        let value = self.peek_int(0)?;
        self.evaluation_stack.drop(1)?;
        Ok(value)
    }

    /// Pops the top item as a byte array.
    pub fn pop_bytes(&mut self) -> VmResult<Vec<u8>> {
        let value = self.peek_bytes(0)?;
        self.evaluation_stack.drop(1)?;
        Ok(value)
    }

    /// Pops the top item as a boolean.
    pub fn pop_bool(&mut self) -> VmResult<bool> {
        Ok(self.pop()?.as_bool())
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new(None, None, InteropService::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: Vec<u8>) -> ExecutionEngine {
        let mut engine = ExecutionEngine::default();
        engine.load_script(script).expect("load");
        engine.execute();
        engine
    }

    #[test]
    fn test_empty_engine_halts() {
        let mut engine = ExecutionEngine::default();
        assert_eq!(engine.execute(), VMState::HALT);
        assert!(engine.fault_reason().is_none());
    }

    #[test]
    fn test_empty_script_halts() {
        let engine = run(Vec::new());
        assert_eq!(engine.state(), VMState::HALT);
        assert!(engine.invocation_stack().is_empty());
    }

    #[test]
    fn test_simple_add() {
        let engine = run(vec![0x52, 0x53, 0x93]);
        assert_eq!(engine.state(), VMState::HALT);
        assert_eq!(engine.evaluation_stack().count(), 1);
        assert_eq!(engine.peek(0).unwrap(), &StackItem::from_int(5));
    }

    #[test]
    fn test_invalid_opcode_faults() {
        let engine = run(vec![0x51, 0x50]);
        assert_eq!(engine.state(), VMState::FAULT);
        assert_eq!(
            engine.fault_reason(),
            Some(&VmError::InvalidOpcode {
                opcode: 0x50,
                position: 1
            })
        );
    }

    #[test]
    fn test_state_is_terminal() {
        let mut engine = run(vec![0xF0]);
        assert_eq!(engine.state(), VMState::FAULT);
        engine.load_script(vec![0x51]).unwrap();
        assert_eq!(engine.step_into(), VMState::FAULT);
        assert_eq!(engine.execute(), VMState::FAULT);
    }

    #[test]
    fn test_push_only_context() {
        let mut engine = ExecutionEngine::default();
        engine.load_push_only_script(vec![0x51, 0x52, 0x66]).unwrap();
        assert_eq!(engine.execute(), VMState::HALT);
        assert_eq!(engine.evaluation_stack().count(), 2);

        let mut engine = ExecutionEngine::default();
        engine.load_push_only_script(vec![0x51, 0x76]).unwrap();
        assert_eq!(engine.execute(), VMState::FAULT);
        assert_eq!(
            engine.fault_reason(),
            Some(&VmError::PushOnlyViolation { opcode: OpCode::DUP })
        );
    }

    #[test]
    fn test_stack_size_limit() {
        let limits = ExecutionEngineLimits {
            max_stack_size: 2,
            ..ExecutionEngineLimits::DEFAULT
        };
        let mut engine = ExecutionEngine::new_with_limits(None, None, InteropService::empty(), limits);
        engine.load_script(vec![0x51, 0x6B, 0x51, 0x51]).unwrap();
        assert_eq!(engine.execute(), VMState::FAULT);
        assert!(matches!(
            engine.fault_reason(),
            Some(VmError::StackOverflow { size: 3, limit: 2 })
        ));
    }

    #[test]
    fn test_stack_size_counts_nested_items() {
        let limits = ExecutionEngineLimits {
            max_stack_size: 4,
            ..ExecutionEngineLimits::DEFAULT
        };
        // NEWARRAY(3) counts as four items; anything more overflows
        let mut engine = ExecutionEngine::new_with_limits(None, None, InteropService::empty(), limits);
        engine.load_script(vec![0x53, 0xC5]).unwrap();
        assert_eq!(engine.execute(), VMState::HALT);

        let mut engine = ExecutionEngine::new_with_limits(None, None, InteropService::empty(), limits);
        engine.load_script(vec![0x53, 0xC5, 0x53, 0xC5]).unwrap();
        assert_eq!(engine.execute(), VMState::FAULT);
        assert!(matches!(engine.fault_reason(), Some(VmError::StackOverflow { limit: 4, .. })));
    }

    #[test]
    fn test_invocation_limit() {
        let limits = ExecutionEngineLimits {
            max_invocation_stack_size: 1,
            ..ExecutionEngineLimits::DEFAULT
        };
        let mut engine = ExecutionEngine::new_with_limits(None, None, InteropService::empty(), limits);
        engine.load_script(vec![0x61]).unwrap();
        assert!(matches!(
            engine.load_script(vec![0x61]),
            Err(VmError::InvocationStackOverflow { .. })
        ));
    }

    #[test]
    fn test_context_accessors() {
        let mut engine = ExecutionEngine::default();
        engine.load_script(vec![0x61]).unwrap();
        assert!(engine.calling_context().is_none());
        engine.load_script(vec![0x62]).unwrap();

        assert_eq!(engine.entry_context().unwrap().script(), &[0x61]);
        assert_eq!(engine.calling_context().unwrap().script(), &[0x61]);
        assert_eq!(engine.current_context().unwrap().script(), &[0x62]);
    }

    #[test]
    fn test_pop_int_keeps_stack_on_type_error() {
        let mut engine = ExecutionEngine::default();
        engine.push(StackItem::from_array(Vec::new())).unwrap();
        assert!(engine.pop_int().is_err());
        assert_eq!(engine.evaluation_stack().count(), 1);
    }
}
