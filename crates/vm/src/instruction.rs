//! Instruction module for the Neo Virtual Machine.
//!
//! This module provides instruction representation and parsing functionality.

use crate::error::{VmError, VmResult};
use crate::op_code::OpCode;

/// The longest interop method name a SYSCALL may carry.
pub const MAX_SYSCALL_NAME_SIZE: usize = 252;

/// Represents an instruction in the Neo Virtual Machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The position of the instruction in the script
    pub pointer: usize,

    /// The opcode of the instruction
    pub opcode: OpCode,

    /// The operand data, without any length prefix
    pub operand: Vec<u8>,

    /// The number of bytes the instruction occupies in the script
    size: usize,
}

impl Instruction {
    /// Parses the instruction starting at `position`.
    pub fn parse(script: &[u8], position: usize) -> VmResult<Self> {
        let byte = *script
            .get(position)
            .ok_or(VmError::InstructionPointerOutOfRange {
                position,
                length: script.len(),
            })?;
        let opcode = OpCode::from_byte(byte).ok_or(VmError::InvalidOpcode {
            opcode: byte,
            position,
        })?;

        let operand_size = opcode.operand_size();
        let mut cursor = position + 1;

        let length = if operand_size.has_size_prefix() {
            let prefix = operand_size.size_prefix();
            let bytes = read(script, cursor, prefix, opcode, position)?;
            cursor += prefix;

            let mut buffer = [0u8; 4];
            buffer[..prefix].copy_from_slice(bytes);
            u32::from_le_bytes(buffer) as usize
        } else {
            operand_size.size()
        };

        if opcode == OpCode::SYSCALL && (length == 0 || length > MAX_SYSCALL_NAME_SIZE) {
            return Err(VmError::InvalidSyscallName(format!(
                "name length {length} at position {position}"
            )));
        }

        let operand = read(script, cursor, length, opcode, position)?.to_vec();
        cursor += length;

        Ok(Self {
            pointer: position,
            opcode,
            operand,
            size: cursor - position,
        })
    }

    /// Returns the opcode of the instruction.
    pub fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// Returns the operand data.
    pub fn operand(&self) -> &[u8] {
        &self.operand
    }

    /// Returns the encoded size of the instruction, including opcode and prefix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reads the operand as a signed little-endian 16-bit jump offset.
    pub fn token_i16(&self) -> VmResult<i16> {
        let bytes: [u8; 2] = self
            .operand
            .as_slice()
            .try_into()
            .map_err(|_| self.truncated())?;
        Ok(i16::from_le_bytes(bytes))
    }

    /// Reads the operand as a 20-byte script hash.
    pub fn token_hash(&self) -> VmResult<[u8; 20]> {
        self.operand
            .as_slice()
            .try_into()
            .map_err(|_| self.truncated())
    }

    /// Reads the operand as an ASCII interop method name.
    pub fn token_string(&self) -> VmResult<String> {
        if !self.operand.is_ascii() {
            return Err(VmError::InvalidSyscallName(
                String::from_utf8_lossy(&self.operand).into_owned(),
            ));
        }
        // ASCII is valid UTF-8.
        Ok(self.operand.iter().map(|&b| b as char).collect())
    }

    fn truncated(&self) -> VmError {
        VmError::TruncatedOperand {
            opcode: self.opcode,
            position: self.pointer,
        }
    }
}

fn read(
    script: &[u8],
    start: usize,
    length: usize,
    opcode: OpCode,
    position: usize,
) -> VmResult<&[u8]> {
    start
        .checked_add(length)
        .and_then(|end| script.get(start..end))
        .ok_or(VmError::TruncatedOperand { opcode, position })
}
