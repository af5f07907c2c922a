//! Control flow operations for the Neo Virtual Machine.
//!
//! This module provides the jump, call, return, syscall and exception
//! handlers for the Neo VM.

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::ExecutionEngine;
use crate::instruction::Instruction;
use crate::interop_service::InteropService;
use crate::op_code::OpCode;

/// Implements the NOP operation.
pub fn nop(_engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    Ok(())
}

/// Resolves the target of a jump relative to the instruction position.
fn jump_target(engine: &ExecutionEngine, instruction: &Instruction) -> VmResult<usize> {
    let context = current(engine)?;
    let offset = instruction.token_i16()?;
    let target = instruction.pointer as isize + offset as isize;
    let length = context.script_len();
    if target < 0 || target as usize > length {
        return Err(VmError::InvalidJump { target, length });
    }
    Ok(target as usize)
}

fn current(engine: &ExecutionEngine) -> VmResult<&ExecutionContext> {
    engine
        .current_context()
        .ok_or_else(|| VmError::invalid_operation_msg("No current context"))
}

/// Implements the JMP, JMPIF and JMPIFNOT operations.
pub fn jmp(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    let target = jump_target(engine, instruction)?;

    let taken = match instruction.opcode() {
        OpCode::JMPIF => engine.pop_bool()?,
        OpCode::JMPIFNOT => !engine.pop_bool()?,
        _ => true,
    };

    if taken {
        if let Some(context) = engine.current_context_mut() {
            context.set_instruction_pointer(target);
        }
    }
    Ok(())
}

/// Implements the CALL operation.
///
/// The new frame shares the caller's script and starts at the target; the
/// caller resumes after the CALL operand.
pub fn call(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    let target = jump_target(engine, instruction)?;
    let frame = current(engine)?.clone_at(target);
    engine.load_context(frame)
}

/// Implements the RET operation.
pub fn ret(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.unload_context()?;
    Ok(())
}

/// Implements the APPCALL and TAILCALL operations.
///
/// An all-zero hash operand takes the hash from the evaluation stack instead.
pub fn app_call(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    let table = engine.script_table().ok_or_else(|| {
        log::warn!("{:?} without a script table", instruction.opcode());
        VmError::MissingScriptTable
    })?;

    let operand = instruction.token_hash()?;
    let hash = if operand.iter().all(|&b| b == 0) {
        engine.pop_bytes()?
    } else {
        operand.to_vec()
    };

    let script = table
        .get_script(&hash)
        .ok_or_else(|| VmError::ScriptNotFound(hex::encode(&hash)))?;

    let context = ExecutionContext::new(script.into(), false);
    if instruction.opcode() == OpCode::TAILCALL {
        engine.replace_context(context)
    } else {
        engine.load_context(context)
    }
}

/// Implements the SYSCALL operation.
pub fn syscall(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    let name = instruction.token_string()?;
    log::trace!("SYSCALL {name}");
    InteropService::invoke(engine, &name)
}

/// Implements the THROW operation.
pub fn throw(_engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    Err(VmError::Throw(instruction.opcode()))
}

/// Implements the THROWIFNOT operation.
pub fn throw_if_not(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    if engine.pop_bool()? {
        Ok(())
    } else {
        Err(VmError::Throw(instruction.opcode()))
    }
}
