use proptest::prelude::*;

use num_bigint::BigInt;
use script_trace::{apply, normalize, ExecError, ExecutionState, Opcode, Value};

fn num_state(values: &[i64]) -> ExecutionState {
    ExecutionState::new(values.iter().copied().map(Value::number).collect(), vec![])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn underflow_yields_stack_underflow_and_preserves_state(
        values in prop::collection::vec(-1000i64..1000, 0..3)
    ) {
        let arities = [
            (Opcode::Add, 2),
            (Opcode::Sub, 2),
            (Opcode::TwoDup, 2),
            (Opcode::Swap, 2),
            (Opcode::Tuck, 2),
            (Opcode::Rot, 3),
            (Opcode::Within, 3),
            (Opcode::ThreeDup, 3),
        ];
        for (op, required) in arities {
            if values.len() < required {
                let state = num_state(&values);
                let err = apply(&state, &op).unwrap_err();
                prop_assert!(
                    matches!(err, ExecError::StackUnderflow { .. }),
                    "{:?} gave {:?}", op, err
                );
                prop_assert_eq!(&state, &num_state(&values));
            }
        }
    }

    #[test]
    fn add_then_sub_restores_the_second_operand(
        b in -100_000i64..100_000,
        a in -100_000i64..100_000,
    ) {
        let state = ExecutionState::new(vec![Value::number(b), Value::number(a)], vec![]);
        let s = apply(&state, &Opcode::Add).unwrap();
        let s = apply(&s, &Opcode::PushBytes(BigInt::from(a))).unwrap();
        let s = apply(&s, &Opcode::Sub).unwrap();
        prop_assert_eq!(s.main.values(), &[Value::number(b)][..]);
    }

    #[test]
    fn dup_adds_one_equal_element(
        values in prop::collection::vec(-1000i64..1000, 1..8)
    ) {
        let state = num_state(&values);
        let s = apply(&state, &Opcode::Dup).unwrap();
        prop_assert_eq!(s.main.len(), state.main.len() + 1);
        prop_assert_eq!(s.main.peek_at(0).unwrap(), s.main.peek_at(1).unwrap());
    }

    #[test]
    fn if_endif_consumes_only_the_condition(
        values in prop::collection::vec(-1000i64..1000, 0..8),
        cond in -1000i64..1000,
    ) {
        let mut seed = values.clone();
        seed.push(cond);
        let s = apply(&num_state(&seed), &Opcode::If).unwrap();
        let s = apply(&s, &Opcode::EndIf).unwrap();
        prop_assert_eq!(s.open_conditionals(), 0);
        let expected = num_state(&values);
        prop_assert_eq!(s.main.values(), expected.main.values());
    }

    #[test]
    fn decimal_literals_normalize_to_their_value(n in any::<i64>()) {
        let op = normalize(&n.to_string()).unwrap();
        prop_assert_eq!(op, Some(Opcode::PushBytes(BigInt::from(n))));
    }

    #[test]
    fn else_without_if_fails_on_any_stack(
        values in prop::collection::vec(-1000i64..1000, 0..8)
    ) {
        let err = apply(&num_state(&values), &Opcode::Else).unwrap_err();
        prop_assert_eq!(err, ExecError::ElseWithoutIf);
    }
}
