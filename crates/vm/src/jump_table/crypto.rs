//! Cryptographic operations for the Neo Virtual Machine.
//!
//! Signatures are 64-byte `r || s` secp256r1 signatures over the SHA-256 of
//! the message. Malformed keys or signatures make a check fail; they never
//! fault the engine.

use crate::big_integer;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::instruction::Instruction;
use crate::stack_item::StackItem;
use neo_cryptography::{hash, ECDsa};

fn digest(engine: &mut ExecutionEngine, hash: impl FnOnce(&[u8]) -> Vec<u8>) -> VmResult<()> {
    let x = engine.pop_bytes()?;
    engine.push(StackItem::from_bytes(hash(&x)))
}

/// Implements the SHA1 operation.
pub fn sha1(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    digest(engine, |x| hash::sha1(x).to_vec())
}

/// Implements the SHA256 operation.
pub fn sha256(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    digest(engine, |x| hash::sha256(x).to_vec())
}

/// Implements the HASH160 operation.
pub fn hash160(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    digest(engine, |x| hash::hash160(x).to_vec())
}

/// Implements the HASH256 operation.
pub fn hash256(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    digest(engine, |x| hash::hash256(x).to_vec())
}

fn check(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    match ECDsa::verify_signature(message, signature, public_key) {
        Ok(valid) => valid,
        Err(err) => {
            log::debug!("signature check rejected input: {err}");
            false
        }
    }
}

fn container_message(engine: &ExecutionEngine) -> Option<Vec<u8>> {
    engine.script_container()?.get_message(0)
}

/// Implements the CHECKSIG operation.
pub fn check_sig(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let public_key = engine.pop_bytes()?;
    let signature = engine.pop_bytes()?;

    let valid = match container_message(engine) {
        Some(message) => check(&message, &signature, &public_key),
        None => {
            log::warn!("CHECKSIG without a script container");
            false
        }
    };
    engine.push_bool(valid)
}

/// Implements the VERIFY operation, which checks against a message taken
/// from the stack instead of the container.
pub fn verify(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(3)?;
    let public_key = engine.pop_bytes()?;
    let signature = engine.pop_bytes()?;
    let message = engine.pop_bytes()?;
    engine.push_bool(check(&message, &signature, &public_key))
}

/// Pops either an array of byte strings or a count followed by that many
/// byte strings.
fn pop_byte_list(engine: &mut ExecutionEngine, max: usize) -> VmResult<Vec<Vec<u8>>> {
    let item = engine.pop()?;
    if let StackItem::Array(array) = &item {
        let list = array
            .items()
            .iter()
            .map(StackItem::as_bytes)
            .collect::<VmResult<Vec<_>>>()?;
        if list.is_empty() || list.len() > max {
            return Err(VmError::InvalidOperand(list.len().to_string()));
        }
        return Ok(list);
    }

    let count = big_integer::to_i64(&item.as_int()?)?;
    let available = engine.evaluation_stack().count();
    if count < 1 || count as usize > max || count as usize > available {
        return Err(VmError::InvalidOperand(count.to_string()));
    }
    (0..count).map(|_| engine.pop_bytes()).collect()
}

/// Implements the CHECKMULTISIG operation.
///
/// Signatures must appear in the same order as the keys they match.
pub fn check_multisig(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let max = engine.limits().max_array_size;
    let public_keys = pop_byte_list(engine, max)?;
    let signatures = pop_byte_list(engine, public_keys.len())?;

    let valid = match container_message(engine) {
        Some(message) => verify_ordered(&message, &signatures, &public_keys),
        None => {
            log::warn!("CHECKMULTISIG without a script container");
            false
        }
    };
    engine.push_bool(valid)
}

fn verify_ordered(message: &[u8], signatures: &[Vec<u8>], public_keys: &[Vec<u8>]) -> bool {
    let (m, n) = (signatures.len(), public_keys.len());
    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if check(message, &signatures[i], &public_keys[j]) {
            i += 1;
        }
        j += 1;
        if m - i > n - j {
            return false;
        }
    }
    i == m
}
