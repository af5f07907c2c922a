//! OpCode module for the Neo Virtual Machine.
//!
//! The byte value of every opcode is part of the script format.

pub mod operand_size;

pub use operand_size::OperandSize;

use num_enum::TryFromPrimitive;
use strum::EnumIter;

/// An instruction of the Neo Virtual Machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, EnumIter)]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum OpCode {
    // Constants
    /// Pushes an empty byte array onto the stack.
    PUSH0 = 0x00,
    /// Pushes the next 1 byte onto the stack.
    PUSHBYTES1 = 0x01,
    PUSHBYTES2 = 0x02,
    PUSHBYTES3 = 0x03,
    PUSHBYTES4 = 0x04,
    PUSHBYTES5 = 0x05,
    PUSHBYTES6 = 0x06,
    PUSHBYTES7 = 0x07,
    PUSHBYTES8 = 0x08,
    PUSHBYTES9 = 0x09,
    PUSHBYTES10 = 0x0A,
    PUSHBYTES11 = 0x0B,
    PUSHBYTES12 = 0x0C,
    PUSHBYTES13 = 0x0D,
    PUSHBYTES14 = 0x0E,
    PUSHBYTES15 = 0x0F,
    PUSHBYTES16 = 0x10,
    PUSHBYTES17 = 0x11,
    PUSHBYTES18 = 0x12,
    PUSHBYTES19 = 0x13,
    PUSHBYTES20 = 0x14,
    PUSHBYTES21 = 0x15,
    PUSHBYTES22 = 0x16,
    PUSHBYTES23 = 0x17,
    PUSHBYTES24 = 0x18,
    PUSHBYTES25 = 0x19,
    PUSHBYTES26 = 0x1A,
    PUSHBYTES27 = 0x1B,
    PUSHBYTES28 = 0x1C,
    PUSHBYTES29 = 0x1D,
    PUSHBYTES30 = 0x1E,
    PUSHBYTES31 = 0x1F,
    PUSHBYTES32 = 0x20,
    PUSHBYTES33 = 0x21,
    PUSHBYTES34 = 0x22,
    PUSHBYTES35 = 0x23,
    PUSHBYTES36 = 0x24,
    PUSHBYTES37 = 0x25,
    PUSHBYTES38 = 0x26,
    PUSHBYTES39 = 0x27,
    PUSHBYTES40 = 0x28,
    PUSHBYTES41 = 0x29,
    PUSHBYTES42 = 0x2A,
    PUSHBYTES43 = 0x2B,
    PUSHBYTES44 = 0x2C,
    PUSHBYTES45 = 0x2D,
    PUSHBYTES46 = 0x2E,
    PUSHBYTES47 = 0x2F,
    PUSHBYTES48 = 0x30,
    PUSHBYTES49 = 0x31,
    PUSHBYTES50 = 0x32,
    PUSHBYTES51 = 0x33,
    PUSHBYTES52 = 0x34,
    PUSHBYTES53 = 0x35,
    PUSHBYTES54 = 0x36,
    PUSHBYTES55 = 0x37,
    PUSHBYTES56 = 0x38,
    PUSHBYTES57 = 0x39,
    PUSHBYTES58 = 0x3A,
    PUSHBYTES59 = 0x3B,
    PUSHBYTES60 = 0x3C,
    PUSHBYTES61 = 0x3D,
    PUSHBYTES62 = 0x3E,
    PUSHBYTES63 = 0x3F,
    PUSHBYTES64 = 0x40,
    PUSHBYTES65 = 0x41,
    PUSHBYTES66 = 0x42,
    PUSHBYTES67 = 0x43,
    PUSHBYTES68 = 0x44,
    PUSHBYTES69 = 0x45,
    PUSHBYTES70 = 0x46,
    PUSHBYTES71 = 0x47,
    PUSHBYTES72 = 0x48,
    PUSHBYTES73 = 0x49,
    PUSHBYTES74 = 0x4A,
    /// Pushes the next 75 bytes onto the stack.
    PUSHBYTES75 = 0x4B,
    /// The next byte contains the number of bytes to push.
    PUSHDATA1 = 0x4C,
    /// The next two bytes contain the number of bytes to push.
    PUSHDATA2 = 0x4D,
    /// The next four bytes contain the number of bytes to push.
    PUSHDATA4 = 0x4E,
    /// Pushes the number -1 onto the stack.
    PUSHM1 = 0x4F,

    /// Pushes the number 1 onto the stack.
    PUSH1 = 0x51,
    PUSH2 = 0x52,
    PUSH3 = 0x53,
    PUSH4 = 0x54,
    PUSH5 = 0x55,
    PUSH6 = 0x56,
    PUSH7 = 0x57,
    PUSH8 = 0x58,
    PUSH9 = 0x59,
    PUSH10 = 0x5A,
    PUSH11 = 0x5B,
    PUSH12 = 0x5C,
    PUSH13 = 0x5D,
    PUSH14 = 0x5E,
    PUSH15 = 0x5F,
    /// Pushes the number 16 onto the stack.
    PUSH16 = 0x60,

    // Flow control
    /// Does nothing.
    NOP = 0x61,
    /// Unconditionally jumps by a signed 2-byte offset.
    JMP = 0x62,
    /// Jumps when the popped value is true.
    JMPIF = 0x63,
    /// Jumps when the popped value is false.
    JMPIFNOT = 0x64,
    /// Calls a function inside the current script.
    CALL = 0x65,
    /// Returns from the current context.
    RET = 0x66,
    /// Calls a script by its 20-byte hash.
    APPCALL = 0x67,
    /// Invokes an interop service by name.
    SYSCALL = 0x68,
    /// Replaces the current context with the script of a 20-byte hash.
    TAILCALL = 0x69,

    // Stack
    /// Copies the top of the alt stack to the evaluation stack.
    DUPFROMALTSTACK = 0x6A,
    /// Moves the top item to the alt stack.
    TOALTSTACK = 0x6B,
    /// Moves the top of the alt stack to the evaluation stack.
    FROMALTSTACK = 0x6C,
    /// Removes the item n back in the stack.
    XDROP = 0x6D,

    /// Swaps the top item with the item n back in the stack.
    XSWAP = 0x72,
    /// Copies the top item to position n in the stack.
    XTUCK = 0x73,
    /// Pushes the number of stack items.
    DEPTH = 0x74,
    /// Removes the top stack item.
    DROP = 0x75,
    /// Duplicates the top stack item.
    DUP = 0x76,
    /// Removes the second-to-top stack item.
    NIP = 0x77,
    /// Copies the second-to-top item to the top.
    OVER = 0x78,
    /// Copies the item n back in the stack to the top.
    PICK = 0x79,
    /// Moves the item n back in the stack to the top.
    ROLL = 0x7A,
    /// Moves the third item to the top.
    ROT = 0x7B,
    /// Swaps the top two items.
    SWAP = 0x7C,
    /// Copies the top item below the second item.
    TUCK = 0x7D,

    // Splice
    /// Concatenates two byte arrays.
    CAT = 0x7E,
    /// Returns a section of a byte array.
    SUBSTR = 0x7F,
    /// Keeps only the characters left of a point.
    LEFT = 0x80,
    /// Keeps only the characters right of a point.
    RIGHT = 0x81,
    /// Pushes the byte length of the top item.
    SIZE = 0x82,

    // Bitwise logic
    /// Flips all of the bits in the input.
    INVERT = 0x83,
    /// Boolean and between each bit in the inputs.
    AND = 0x84,
    /// Boolean or between each bit in the inputs.
    OR = 0x85,
    /// Boolean exclusive or between each bit in the inputs.
    XOR = 0x86,
    /// Pushes true if the inputs are equal.
    EQUAL = 0x87,

    // Arithmetic
    /// Adds 1 to the input.
    INC = 0x8B,
    /// Subtracts 1 from the input.
    DEC = 0x8C,
    /// Pushes the sign of the input.
    SIGN = 0x8D,
    /// Flips the sign of the input.
    NEGATE = 0x8F,
    /// Makes the input positive.
    ABS = 0x90,
    /// Logical not of the input.
    NOT = 0x91,
    /// Pushes true if the input is not zero.
    NZ = 0x92,
    /// a is added to b.
    ADD = 0x93,
    /// b is subtracted from a.
    SUB = 0x94,
    /// a is multiplied by b.
    MUL = 0x95,
    /// a is divided by b, truncating toward zero.
    DIV = 0x96,
    /// Remainder after dividing a by b.
    MOD = 0x97,
    /// Shifts a left by b bits.
    SHL = 0x98,
    /// Shifts a right by b bits.
    SHR = 0x99,
    /// Pushes true if both a and b are true.
    BOOLAND = 0x9A,
    /// Pushes true if a or b is true.
    BOOLOR = 0x9B,
    /// Pushes true if the numbers are equal.
    NUMEQUAL = 0x9C,
    /// Pushes true if the numbers are not equal.
    NUMNOTEQUAL = 0x9E,
    /// Pushes true if a is less than b.
    LT = 0x9F,
    /// Pushes true if a is greater than b.
    GT = 0xA0,
    /// Pushes true if a is less than or equal to b.
    LTE = 0xA1,
    /// Pushes true if a is greater than or equal to b.
    GTE = 0xA2,
    /// Pushes the smaller of a and b.
    MIN = 0xA3,
    /// Pushes the larger of a and b.
    MAX = 0xA4,
    /// Pushes true if x is within the range [min, max).
    WITHIN = 0xA5,

    // Crypto
    /// Hashes the input with SHA-1.
    SHA1 = 0xA7,
    /// Hashes the input with SHA-256.
    SHA256 = 0xA8,
    /// Hashes the input with SHA-256 then RIPEMD-160.
    HASH160 = 0xA9,
    /// Hashes the input twice with SHA-256.
    HASH256 = 0xAA,
    /// Verifies a signature over the script container message.
    CHECKSIG = 0xAC,
    /// Verifies a signature over an explicit message.
    VERIFY = 0xAD,
    /// Verifies m of n signatures over the script container message.
    CHECKMULTISIG = 0xAE,

    // Array
    /// Pushes the element count or byte length of the top item.
    ARRAYSIZE = 0xC0,
    /// Packs n items into an array.
    PACK = 0xC1,
    /// Unpacks an array onto the stack.
    UNPACK = 0xC2,
    /// Reads an element of an array or map.
    PICKITEM = 0xC3,
    /// Writes an element of an array or map.
    SETITEM = 0xC4,
    /// Creates an array of n false values.
    NEWARRAY = 0xC5,
    /// Creates a struct of n false values.
    NEWSTRUCT = 0xC6,
    /// Creates an empty map.
    NEWMAP = 0xC7,
    /// Appends an item to an array.
    APPEND = 0xC8,
    /// Reverses an array in place.
    REVERSE = 0xC9,
    /// Removes an element from an array or map.
    REMOVE = 0xCA,
    /// Pushes true if an array index or map key exists.
    HASKEY = 0xCB,
    /// Pushes an array of the keys of a map.
    KEYS = 0xCC,
    /// Pushes an array of the values of a container.
    VALUES = 0xCD,

    // Exceptions
    /// Faults the engine.
    THROW = 0xF0,
    /// Faults the engine when the popped value is false.
    THROWIFNOT = 0xF1,
}

impl OpCode {
    /// Decodes an opcode byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::try_from(byte).ok()
    }

    /// Returns the byte value of the opcode.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns true for PUSH0 through PUSH16.
    #[inline]
    pub fn is_push(self) -> bool {
        self <= OpCode::PUSH16
    }

    /// Returns the operand layout that follows the opcode byte.
    pub fn operand_size(self) -> OperandSize {
        match self {
            OpCode::PUSHBYTES1
            | OpCode::PUSHBYTES2
            | OpCode::PUSHBYTES3
            | OpCode::PUSHBYTES4
            | OpCode::PUSHBYTES5
            | OpCode::PUSHBYTES6
            | OpCode::PUSHBYTES7
            | OpCode::PUSHBYTES8
            | OpCode::PUSHBYTES9
            | OpCode::PUSHBYTES10
            | OpCode::PUSHBYTES11
            | OpCode::PUSHBYTES12
            | OpCode::PUSHBYTES13
            | OpCode::PUSHBYTES14
            | OpCode::PUSHBYTES15
            | OpCode::PUSHBYTES16
            | OpCode::PUSHBYTES17
            | OpCode::PUSHBYTES18
            | OpCode::PUSHBYTES19
            | OpCode::PUSHBYTES20
            | OpCode::PUSHBYTES21
            | OpCode::PUSHBYTES22
            | OpCode::PUSHBYTES23
            | OpCode::PUSHBYTES24
            | OpCode::PUSHBYTES25
            | OpCode::PUSHBYTES26
            | OpCode::PUSHBYTES27
            | OpCode::PUSHBYTES28
            | OpCode::PUSHBYTES29
            | OpCode::PUSHBYTES30
            | OpCode::PUSHBYTES31
            | OpCode::PUSHBYTES32
            | OpCode::PUSHBYTES33
            | OpCode::PUSHBYTES34
            | OpCode::PUSHBYTES35
            | OpCode::PUSHBYTES36
            | OpCode::PUSHBYTES37
            | OpCode::PUSHBYTES38
            | OpCode::PUSHBYTES39
            | OpCode::PUSHBYTES40
            | OpCode::PUSHBYTES41
            | OpCode::PUSHBYTES42
            | OpCode::PUSHBYTES43
            | OpCode::PUSHBYTES44
            | OpCode::PUSHBYTES45
            | OpCode::PUSHBYTES46
            | OpCode::PUSHBYTES47
            | OpCode::PUSHBYTES48
            | OpCode::PUSHBYTES49
            | OpCode::PUSHBYTES50
            | OpCode::PUSHBYTES51
            | OpCode::PUSHBYTES52
            | OpCode::PUSHBYTES53
            | OpCode::PUSHBYTES54
            | OpCode::PUSHBYTES55
            | OpCode::PUSHBYTES56
            | OpCode::PUSHBYTES57
            | OpCode::PUSHBYTES58
            | OpCode::PUSHBYTES59
            | OpCode::PUSHBYTES60
            | OpCode::PUSHBYTES61
            | OpCode::PUSHBYTES62
            | OpCode::PUSHBYTES63
            | OpCode::PUSHBYTES64
            | OpCode::PUSHBYTES65
            | OpCode::PUSHBYTES66
            | OpCode::PUSHBYTES67
            | OpCode::PUSHBYTES68
            | OpCode::PUSHBYTES69
            | OpCode::PUSHBYTES70
            | OpCode::PUSHBYTES71
            | OpCode::PUSHBYTES72
            | OpCode::PUSHBYTES73
            | OpCode::PUSHBYTES74
            | OpCode::PUSHBYTES75 => OperandSize::fixed(self as usize),
            OpCode::PUSHDATA1 | OpCode::SYSCALL => OperandSize::prefix(1),
            OpCode::PUSHDATA2 => OperandSize::prefix(2),
            OpCode::PUSHDATA4 => OperandSize::prefix(4),
            OpCode::JMP | OpCode::JMPIF | OpCode::JMPIFNOT | OpCode::CALL => OperandSize::fixed(2),
            OpCode::APPCALL | OpCode::TAILCALL => OperandSize::fixed(20),
            _ => OperandSize::none(),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self {
        opcode as u8
    }
}
