//! Integer codec for the Neo Virtual Machine.
//!
//! Integers travel between stack items as minimal two's-complement
//! little-endian byte strings. Zero is the empty string.

use crate::error::{VmError, VmResult};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// Encodes an integer as minimal two's-complement little-endian bytes.
pub fn encode(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_signed_bytes_le()
    }
}

/// Decodes two's-complement little-endian bytes. The sign is taken from the
/// high bit of the last byte.
pub fn decode(bytes: &[u8]) -> BigInt {
    if bytes.is_empty() {
        BigInt::zero()
    } else {
        BigInt::from_signed_bytes_le(bytes)
    }
}

/// Returns the length of the encoded form of `value`.
pub fn encoded_len(value: &BigInt) -> usize {
    if value.is_zero() {
        0
    } else {
        // bits() excludes the sign, one extra bit is needed for it.
        (value.bits() as usize) / 8 + 1 - usize::from(is_negative_power_of_two_boundary(value))
    }
}

// -128, -32768, ... encode in one byte fewer than their magnitude suggests.
fn is_negative_power_of_two_boundary(value: &BigInt) -> bool {
    if !value.is_negative() {
        return false;
    }
    let magnitude = value.magnitude();
    let bits = magnitude.bits();
    bits % 8 == 0 && magnitude.trailing_zeros() == Some(bits - 1)
}

/// Fails when the encoded form of `value` is longer than `limit` bytes.
pub fn check_size(value: &BigInt, limit: usize) -> VmResult<()> {
    let size = encoded_len(value);
    if size > limit {
        return Err(VmError::IntegerTooLarge { size, limit });
    }
    Ok(())
}

/// Validates a shift count for SHL/SHR.
pub fn to_shift(value: &BigInt, max_shift: usize) -> VmResult<usize> {
    match value.to_usize() {
        Some(shift) if shift <= max_shift => Ok(shift),
        _ => Err(VmError::InvalidShift {
            shift: value.to_string(),
            max: max_shift,
        }),
    }
}

/// Converts an index or count operand to `i64`.
pub fn to_i64(value: &BigInt) -> VmResult<i64> {
    value
        .to_i64()
        .ok_or_else(|| VmError::InvalidOperand(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: BigInt) {
        let bytes = encode(&value);
        assert_eq!(bytes.len(), encoded_len(&value), "length of {value}");
        assert_eq!(decode(&bytes), value);
    }

    #[test]
    fn test_zero_is_empty() {
        assert!(encode(&BigInt::zero()).is_empty());
        assert_eq!(decode(&[]), BigInt::zero());
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode(&BigInt::from(1)), vec![0x01]);
        assert_eq!(encode(&BigInt::from(-1)), vec![0xFF]);
        assert_eq!(encode(&BigInt::from(127)), vec![0x7F]);
        assert_eq!(encode(&BigInt::from(128)), vec![0x80, 0x00]);
        assert_eq!(encode(&BigInt::from(-128)), vec![0x80]);
        assert_eq!(encode(&BigInt::from(255)), vec![0xFF, 0x00]);
        assert_eq!(encode(&BigInt::from(-129)), vec![0x7F, 0xFF]);
        assert_eq!(encode(&BigInt::from(256)), vec![0x00, 0x01]);
    }

    #[test]
    fn test_non_minimal_input_decodes() {
        assert_eq!(decode(&[0x01, 0x00, 0x00]), BigInt::from(1));
        assert_eq!(decode(&[0xFF, 0xFF]), BigInt::from(-1));
        assert_eq!(decode(&[0x00]), BigInt::zero());
    }

    #[test]
    fn test_boundary_roundtrips() {
        for value in [
            0i64,
            1,
            -1,
            127,
            128,
            -128,
            -129,
            255,
            256,
            32767,
            32768,
            -32768,
            -32769,
            i32::MAX as i64,
            i32::MIN as i64,
            i64::MAX,
            i64::MIN,
        ] {
            roundtrip(BigInt::from(value));
        }

        let min = BigInt::from(i64::MIN);
        roundtrip(&min * &min * &min);
    }

    #[test]
    fn test_check_size() {
        let big = BigInt::from(1) << 255;
        assert_eq!(encoded_len(&big), 33);
        assert!(check_size(&big, 32).is_err());
        assert!(check_size(&(big - 1), 32).is_ok());
        assert!(check_size(&-(BigInt::from(1) << 255usize), 32).is_ok());
    }

    #[test]
    fn test_to_shift() {
        assert_eq!(to_shift(&BigInt::from(0), 256).unwrap(), 0);
        assert_eq!(to_shift(&BigInt::from(256), 256).unwrap(), 256);
        assert!(to_shift(&BigInt::from(257), 256).is_err());
        assert!(to_shift(&BigInt::from(-1), 256).is_err());
    }
}
