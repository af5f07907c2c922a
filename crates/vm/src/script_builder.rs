//! Script builder module for the Neo Virtual Machine.
//!
//! This module provides a way to programmatically construct scripts for the Neo VM.

use crate::big_integer;
use crate::error::{VmError, VmResult};
use crate::instruction::MAX_SYSCALL_NAME_SIZE;
use crate::op_code::OpCode;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Helps construct VM scripts programmatically.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    /// The script being built
    script: Vec<u8>,
}

impl ScriptBuilder {
    /// Creates a new script builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bytes emitted so far.
    pub fn len(&self) -> usize {
        self.script.len()
    }

    /// Returns true if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// Emits an opcode to the script.
    pub fn emit(&mut self, op: OpCode) -> &mut Self {
        self.script.push(op.as_u8());
        self
    }

    /// Emits raw bytes to the script.
    pub fn emit_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.script.extend_from_slice(bytes);
        self
    }

    /// Emits the shortest push instruction for `data`.
    pub fn emit_push_bytes(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();

        if len == 0 {
            self.emit(OpCode::PUSH0);
        } else if len <= OpCode::PUSHBYTES75.as_u8() as usize {
            self.script.push(len as u8);
        } else if len <= 0xFF {
            self.emit(OpCode::PUSHDATA1);
            self.script.push(len as u8);
        } else if len <= 0xFFFF {
            self.emit(OpCode::PUSHDATA2);
            self.script.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.emit(OpCode::PUSHDATA4);
            self.script.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.script.extend_from_slice(data);
        self
    }

    /// Emits a push operation for an integer.
    ///
    /// -1 through 16 use the single-byte constants; anything else is pushed
    /// as its minimal two's-complement encoding.
    pub fn emit_push_int(&mut self, value: impl Into<BigInt>) -> &mut Self {
        let value = value.into();
        match value.to_i8() {
            Some(-1) => self.emit(OpCode::PUSHM1),
            Some(0) => self.emit(OpCode::PUSH0),
            Some(n @ 1..=16) => {
                self.script.push(OpCode::PUSH1.as_u8() + (n as u8 - 1));
                self
            }
            _ => self.emit_push_bytes(&big_integer::encode(&value)),
        }
    }

    /// Emits a push operation for a boolean.
    pub fn emit_push_bool(&mut self, value: bool) -> &mut Self {
        if value {
            self.emit(OpCode::PUSH1)
        } else {
            self.emit(OpCode::PUSH0)
        }
    }

    /// Emits a push operation for a UTF-8 string.
    pub fn emit_push_string(&mut self, value: &str) -> &mut Self {
        self.emit_push_bytes(value.as_bytes())
    }

    /// Emits a jump operation. `offset` is relative to the jump opcode.
    pub fn emit_jump(&mut self, op: OpCode, offset: i16) -> VmResult<&mut Self> {
        if !matches!(
            op,
            OpCode::JMP | OpCode::JMPIF | OpCode::JMPIFNOT | OpCode::CALL
        ) {
            return Err(VmError::invalid_operation_msg(format!(
                "{op:?} is not a jump"
            )));
        }
        self.emit(op);
        self.script.extend_from_slice(&offset.to_le_bytes());
        Ok(self)
    }

    /// Emits a call operation.
    pub fn emit_call(&mut self, offset: i16) -> &mut Self {
        self.emit(OpCode::CALL);
        self.script.extend_from_slice(&offset.to_le_bytes());
        self
    }

    /// Emits APPCALL, or TAILCALL when `tail` is set.
    ///
    /// A zero hash makes the callee take the hash from the stack.
    pub fn emit_app_call(&mut self, script_hash: &[u8; 20], tail: bool) -> &mut Self {
        self.emit(if tail { OpCode::TAILCALL } else { OpCode::APPCALL });
        self.script.extend_from_slice(script_hash);
        self
    }

    /// Emits a syscall operation.
    pub fn emit_syscall(&mut self, api: &str) -> VmResult<&mut Self> {
        let api_bytes = api.as_bytes();
        if api_bytes.is_empty() || api_bytes.len() > MAX_SYSCALL_NAME_SIZE {
            return Err(VmError::InvalidSyscallName(api.to_string()));
        }

        self.emit(OpCode::SYSCALL);
        self.script.push(api_bytes.len() as u8);
        self.script.extend_from_slice(api_bytes);
        Ok(self)
    }

    /// Returns a copy of the script.
    pub fn to_vec(&self) -> Vec<u8> {
        self.script.clone()
    }

    /// Consumes the builder and returns the script.
    pub fn into_vec(self) -> Vec<u8> {
        self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_opcode() {
        let mut builder = ScriptBuilder::new();
        builder.emit(OpCode::PUSH1).emit(OpCode::PUSH2).emit(OpCode::ADD);

        let script = builder.to_vec();
        assert_eq!(script, vec![OpCode::PUSH1 as u8, OpCode::PUSH2 as u8, OpCode::ADD as u8]);
    }

    #[test]
    fn test_emit_push_int() {
        let mut builder = ScriptBuilder::new();
        builder
            .emit_push_int(-1)
            .emit_push_int(0)
            .emit_push_int(10)
            .emit_push_int(16)
            .emit_push_int(17)
            .emit_push_int(-100)
            .emit_push_int(128);

        assert_eq!(
            builder.to_vec(),
            vec![
                OpCode::PUSHM1 as u8,
                OpCode::PUSH0 as u8,
                OpCode::PUSH10 as u8,
                OpCode::PUSH16 as u8,
                0x01,
                17,
                0x01,
                0x9C,
                0x02,
                0x80,
                0x00,
            ]
        );
    }

    #[test]
    fn test_emit_push_bool() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push_bool(true).emit_push_bool(false);
        assert_eq!(builder.to_vec(), vec![OpCode::PUSH1 as u8, OpCode::PUSH0 as u8]);
    }

    #[test]
    fn test_emit_push_bytes_thresholds() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push_bytes(&[1, 2, 3]);
        assert_eq!(builder.to_vec(), vec![3, 1, 2, 3]);

        let mut builder = ScriptBuilder::new();
        builder.emit_push_bytes(&[0; 75]);
        assert_eq!(builder.to_vec()[0], 75);

        let mut builder = ScriptBuilder::new();
        builder.emit_push_bytes(&[0; 76]);
        assert_eq!(&builder.to_vec()[..2], &[OpCode::PUSHDATA1 as u8, 76]);

        let mut builder = ScriptBuilder::new();
        builder.emit_push_bytes(&[0; 65000]);
        let script = builder.to_vec();
        assert_eq!(&script[..3], &[OpCode::PUSHDATA2 as u8, 0xE8, 0xFD]);
        assert_eq!(script.len(), 3 + 65000);

        let mut builder = ScriptBuilder::new();
        builder.emit_push_bytes(&vec![0; 0x10000]);
        assert_eq!(&builder.to_vec()[..5], &[OpCode::PUSHDATA4 as u8, 0x00, 0x00, 0x01, 0x00]);

        let mut builder = ScriptBuilder::new();
        builder.emit_push_bytes(&[]);
        assert_eq!(builder.to_vec(), vec![OpCode::PUSH0 as u8]);
    }

    #[test]
    fn test_emit_jump() {
        let mut builder = ScriptBuilder::new();
        builder.emit_jump(OpCode::JMP, 10).unwrap();
        builder.emit_jump(OpCode::JMPIF, -3).unwrap();
        assert_eq!(builder.to_vec(), vec![OpCode::JMP as u8, 10, 0, OpCode::JMPIF as u8, 0xFD, 0xFF]);

        assert!(ScriptBuilder::new().emit_jump(OpCode::ADD, 1).is_err());
    }

    #[test]
    fn test_emit_app_call() {
        let mut builder = ScriptBuilder::new();
        builder.emit_app_call(&[0xAB; 20], false).emit_app_call(&[0; 20], true);
        let script = builder.to_vec();
        assert_eq!(script.len(), 42);
        assert_eq!(script[0], OpCode::APPCALL as u8);
        assert_eq!(script[21], OpCode::TAILCALL as u8);
    }

    #[test]
    fn test_emit_syscall() {
        let mut builder = ScriptBuilder::new();
        builder.emit_syscall("System.Runtime.Log").unwrap();

        let script = builder.to_vec();
        assert_eq!(script[0], OpCode::SYSCALL as u8);
        assert_eq!(script[1], 18);
        assert_eq!(&script[2..20], b"System.Runtime.Log");
    }

    #[test]
    fn test_emit_syscall_rejects_long_names() {
        let name = "a".repeat(MAX_SYSCALL_NAME_SIZE + 1);
        assert!(matches!(
            ScriptBuilder::new().emit_syscall(&name),
            Err(VmError::InvalidSyscallName(_))
        ));
        assert!(ScriptBuilder::new().emit_syscall(&"a".repeat(MAX_SYSCALL_NAME_SIZE)).is_ok());
        assert!(ScriptBuilder::new().emit_syscall("").is_err());
    }
}
