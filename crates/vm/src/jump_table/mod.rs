//! Jump table module for the Neo Virtual Machine.
//!
//! Dispatches every opcode to its handler. The match is exhaustive over
//! [`OpCode`], so adding an opcode without a handler does not compile.

pub mod bitwise;
pub mod compound;
pub mod control;
pub mod crypto;
pub mod numeric;
pub mod push;
pub mod splice;
pub mod stack;

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::instruction::Instruction;
use crate::op_code::OpCode;

/// A handler for a VM instruction.
pub type InstructionHandler = fn(&mut ExecutionEngine, &Instruction) -> VmResult<()>;

/// Executes an instruction against the engine.
pub fn execute(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    handler(instruction.opcode())(engine, instruction)
}

/// Returns the handler for an opcode.
pub fn handler(opcode: OpCode) -> InstructionHandler {
    match opcode {
        // Constants
        OpCode::PUSH0 => push::push0,
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
        | OpCode::PUSHBYTES75
        | OpCode::PUSHDATA1
        | OpCode::PUSHDATA2
        | OpCode::PUSHDATA4 => push::push_data,
        OpCode::PUSHM1
        | OpCode::PUSH1
        | OpCode::PUSH2
        | OpCode::PUSH3
        | OpCode::PUSH4
        | OpCode::PUSH5
        | OpCode::PUSH6
        | OpCode::PUSH7
        | OpCode::PUSH8
        | OpCode::PUSH9
        | OpCode::PUSH10
        | OpCode::PUSH11
        | OpCode::PUSH12
        | OpCode::PUSH13
        | OpCode::PUSH14
        | OpCode::PUSH15
        | OpCode::PUSH16 => push::push_int,

        // Flow control
        OpCode::NOP => control::nop,
        OpCode::JMP | OpCode::JMPIF | OpCode::JMPIFNOT => control::jmp,
        OpCode::CALL => control::call,
        OpCode::RET => control::ret,
        OpCode::APPCALL | OpCode::TAILCALL => control::app_call,
        OpCode::SYSCALL => control::syscall,

        // Stack
        OpCode::DUPFROMALTSTACK => stack::dup_from_alt_stack,
        OpCode::TOALTSTACK => stack::to_alt_stack,
        OpCode::FROMALTSTACK => stack::from_alt_stack,
        OpCode::XDROP => stack::xdrop,
        OpCode::XSWAP => stack::xswap,
        OpCode::XTUCK => stack::xtuck,
        OpCode::DEPTH => stack::depth,
        OpCode::DROP => stack::drop,
        OpCode::DUP => stack::dup,
        OpCode::NIP => stack::nip,
        OpCode::OVER => stack::over,
        OpCode::PICK => stack::pick,
        OpCode::ROLL => stack::roll,
        OpCode::ROT => stack::rot,
        OpCode::SWAP => stack::swap,
        OpCode::TUCK => stack::tuck,

        // Splice
        OpCode::CAT => splice::cat,
        OpCode::SUBSTR => splice::substr,
        OpCode::LEFT => splice::left,
        OpCode::RIGHT => splice::right,
        OpCode::SIZE => splice::size,

        // Bitwise logic
        OpCode::INVERT => bitwise::invert,
        OpCode::AND => bitwise::and,
        OpCode::OR => bitwise::or,
        OpCode::XOR => bitwise::xor,
        OpCode::EQUAL => bitwise::equal,

        // Arithmetic
        OpCode::INC => numeric::inc,
        OpCode::DEC => numeric::dec,
        OpCode::SIGN => numeric::sign,
        OpCode::NEGATE => numeric::negate,
        OpCode::ABS => numeric::abs,
        OpCode::NOT => numeric::not,
        OpCode::NZ => numeric::nz,
        OpCode::ADD => numeric::add,
        OpCode::SUB => numeric::sub,
        OpCode::MUL => numeric::mul,
        OpCode::DIV => numeric::div,
        OpCode::MOD => numeric::modulo,
        OpCode::SHL => numeric::shl,
        OpCode::SHR => numeric::shr,
        OpCode::BOOLAND => numeric::booland,
        OpCode::BOOLOR => numeric::boolor,
        OpCode::NUMEQUAL => numeric::numequal,
        OpCode::NUMNOTEQUAL => numeric::numnotequal,
        OpCode::LT => numeric::lt,
        OpCode::GT => numeric::gt,
        OpCode::LTE => numeric::lte,
        OpCode::GTE => numeric::gte,
        OpCode::MIN => numeric::min,
        OpCode::MAX => numeric::max,
        OpCode::WITHIN => numeric::within,

        // Crypto
        OpCode::SHA1 => crypto::sha1,
        OpCode::SHA256 => crypto::sha256,
        OpCode::HASH160 => crypto::hash160,
        OpCode::HASH256 => crypto::hash256,
        OpCode::CHECKSIG => crypto::check_sig,
        OpCode::VERIFY => crypto::verify,
        OpCode::CHECKMULTISIG => crypto::check_multisig,

        // Array
        OpCode::ARRAYSIZE => compound::array_size,
        OpCode::PACK => compound::pack,
        OpCode::UNPACK => compound::unpack,
        OpCode::PICKITEM => compound::pick_item,
        OpCode::SETITEM => compound::set_item,
        OpCode::NEWARRAY | OpCode::NEWSTRUCT => compound::new_array,
        OpCode::NEWMAP => compound::new_map,
        OpCode::APPEND => compound::append,
        OpCode::REVERSE => compound::reverse,
        OpCode::REMOVE => compound::remove,
        OpCode::HASKEY => compound::has_key,
        OpCode::KEYS => compound::keys,
        OpCode::VALUES => compound::values,

        // Exceptions
        OpCode::THROW => control::throw,
        OpCode::THROWIFNOT => control::throw_if_not,
    }
}

/// Pops an index or count operand as `usize`. Negative values fail with the
/// operand already consumed.
pub(crate) fn pop_index(engine: &mut ExecutionEngine) -> VmResult<usize> {
    let value = crate::big_integer::to_i64(&engine.pop_int()?)?;
    usize::try_from(value).map_err(|_| crate::error::VmError::NegativeOperand(value.to_string()))
}
