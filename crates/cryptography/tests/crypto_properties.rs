//! Property-based tests for hashing and secp256r1 signatures.

use neo_cryptography::{hash160, hash256, sha256, ECDsa};
use proptest::prelude::*;

fn private_key_strategy() -> impl Strategy<Value = [u8; 32]> {
    // Leading byte below 0xff keeps the scalar under the curve order.
    (1u8..0xfe, prop::array::uniform31(any::<u8>())).prop_map(|(head, tail)| {
        let mut key = [0u8; 32];
        key[0] = head;
        key[1..].copy_from_slice(&tail);
        key
    })
}

mod ecdsa_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_signatures_verify_under_their_key(
            private_key in private_key_strategy(),
            message in prop::collection::vec(any::<u8>(), 0..256),
        ) {
            let public_key = ECDsa::derive_public_key(&private_key).expect("valid private key");
            let signature = ECDsa::sign(&message, &private_key).expect("sign");

            prop_assert_eq!(signature.len(), 64);
            prop_assert!(ECDsa::verify_signature(&message, &signature, &public_key).expect("verify"));
        }

        #[test]
        fn prop_verification_is_deterministic(
            message in prop::array::uniform32(any::<u8>()),
            signature in prop::collection::vec(any::<u8>(), 64..=64),
            pubkey in prop::collection::vec(any::<u8>(), 33..=33),
        ) {
            let first = ECDsa::verify_signature(&message, &signature, &pubkey);
            let second = ECDsa::verify_signature(&message, &signature, &pubkey);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_wrong_length_signatures_are_errors(
            message in prop::array::uniform32(any::<u8>()),
            signature in prop::collection::vec(any::<u8>(), 0..=63),
        ) {
            let public_key = ECDsa::derive_public_key(&[7u8; 32]).expect("valid private key");
            prop_assert!(ECDsa::verify_signature(&message, &signature, &public_key).is_err());
        }
    }
}

mod hash_properties {
    use super::*;

    proptest! {
        #[test]
        fn prop_hash_lengths(data in prop::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(sha256(&data).len(), 32);
            prop_assert_eq!(hash160(&data).len(), 20);
            prop_assert_eq!(hash256(&data).len(), 32);
        }

        #[test]
        fn prop_hash256_differs_from_sha256(data in prop::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_ne!(hash256(&data), sha256(&data));
        }
    }
}
