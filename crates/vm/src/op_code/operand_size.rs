//! Operand size information for Neo VM opcodes.

/// Describes the operand that follows an opcode byte.
///
/// An operand either has a fixed size or a little-endian length prefix of
/// `size_prefix` bytes followed by that many data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandSize {
    /// The size of the operand, if fixed
    size: usize,

    /// The size prefix of the operand, if variable
    size_prefix: usize,
}

impl OperandSize {
    /// An opcode without operand.
    pub const fn none() -> Self {
        Self {
            size: 0,
            size_prefix: 0,
        }
    }

    /// Creates a new operand size with a fixed size.
    pub const fn fixed(size: usize) -> Self {
        Self {
            size,
            size_prefix: 0,
        }
    }

    /// Creates a new operand size with a size prefix.
    pub const fn prefix(size_prefix: usize) -> Self {
        Self {
            size: 0,
            size_prefix,
        }
    }

    /// Gets the fixed size of the operand.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets the size prefix of the operand.
    pub fn size_prefix(&self) -> usize {
        self.size_prefix
    }

    pub fn has_fixed_size(&self) -> bool {
        self.size > 0
    }

    pub fn has_size_prefix(&self) -> bool {
        self.size_prefix > 0
    }
}
