//! Property-based tests for the VM.

use neo_legacy_vm::stack_item::serialization::{deserialize, serialize};
use neo_legacy_vm::{
    big_integer, ExecutionEngine, ExecutionEngineLimits, Map, OpCode, ScriptBuilder, StackItem,
    VMState,
};
use num_bigint::BigInt;
use proptest::prelude::*;

fn item_strategy() -> impl Strategy<Value = StackItem> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(StackItem::from_bool),
        any::<i64>().prop_map(StackItem::from_int),
        prop::collection::vec(any::<u8>(), 0..40).prop_map(StackItem::from_bytes),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(StackItem::from_array),
            prop::collection::vec(inner.clone(), 0..6).prop_map(StackItem::from_struct),
            prop::collection::vec((any::<i32>(), inner), 0..6).prop_map(|entries| {
                let map = Map::new();
                for (key, value) in entries {
                    map.insert(StackItem::from_int(key), value).expect("primitive key");
                }
                StackItem::Map(map)
            }),
        ]
    })
}

fn run(script: Vec<u8>) -> ExecutionEngine {
    let mut engine = ExecutionEngine::default();
    engine.load_script(script).unwrap();
    engine.execute();
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_serialization_is_stable(item in item_strategy()) {
        let limits = ExecutionEngineLimits::DEFAULT;
        let bytes = serialize(&item, &limits).expect("serialize");
        let decoded = deserialize(&bytes, &limits).expect("deserialize");
        prop_assert_eq!(serialize(&decoded, &limits).expect("reserialize"), bytes);
        prop_assert_eq!(decoded.stack_item_type(), item.stack_item_type());
    }

    #[test]
    fn prop_truncated_input_is_rejected(item in item_strategy(), cut in any::<prop::sample::Index>()) {
        let limits = ExecutionEngineLimits::DEFAULT;
        let bytes = serialize(&item, &limits).expect("serialize");
        let cut = cut.index(bytes.len());
        prop_assert!(deserialize(&bytes[..cut], &limits).is_err());
    }

    #[test]
    fn prop_integer_encoding_is_minimal(value in any::<i128>()) {
        let value = BigInt::from(value);
        let bytes = big_integer::encode(&value);
        prop_assert_eq!(big_integer::decode(&bytes), value.clone());
        prop_assert_eq!(bytes.len(), big_integer::encoded_len(&value));
        if bytes.len() > 1 {
            let last = bytes[bytes.len() - 1];
            let prev = bytes[bytes.len() - 2];
            // no redundant sign byte
            prop_assert!(!(last == 0x00 && prev & 0x80 == 0));
            prop_assert!(!(last == 0xFF && prev & 0x80 != 0));
        }
    }

    #[test]
    fn prop_pushed_integers_reach_the_stack(value in any::<i64>()) {
        let mut builder = ScriptBuilder::new();
        builder.emit_push_int(value);
        let engine = run(builder.to_vec());
        prop_assert_eq!(engine.state(), VMState::HALT);
        prop_assert_eq!(
            engine.evaluation_stack().peek(0).unwrap().as_int().unwrap(),
            BigInt::from(value)
        );
    }

    #[test]
    fn prop_arithmetic_matches_bigint(a in any::<i64>(), b in any::<i64>()) {
        for (opcode, expected) in [
            (OpCode::ADD, BigInt::from(a) + b),
            (OpCode::SUB, BigInt::from(a) - b),
            (OpCode::MUL, BigInt::from(a) * b),
        ] {
            let mut builder = ScriptBuilder::new();
            builder.emit_push_int(a).emit_push_int(b).emit(opcode);
            let engine = run(builder.to_vec());
            prop_assert_eq!(engine.state(), VMState::HALT);
            prop_assert_eq!(engine.evaluation_stack().peek(0).unwrap().as_int().unwrap(), expected);
        }
    }

    #[test]
    fn prop_terminal_states_are_final(script in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut engine = ExecutionEngine::default();
        engine.load_script(script).unwrap();
        let mut steps = 0u32;
        while engine.state() == VMState::NONE && steps < 10_000 {
            engine.step_into();
            steps += 1;
        }
        let state = engine.state();
        if state != VMState::NONE {
            prop_assert_eq!(engine.step_into(), state);
            prop_assert_eq!(engine.execute(), state);
            prop_assert_eq!(engine.fault_reason().is_some(), state == VMState::FAULT);
        }
    }
}
