use super::framework::TestFramework;
use crate::{
    circuits::{
        builder::CircuitBuilder,
        component::{Instance, InstanceState},
        config::TableConfig,
        polynomials::{
            array_swap::{ArraySwap, ArraySwapInput, ArraySwapParams},
            division_or_zero::{DivisionInput, DivisionOrZero},
            padding::{Padding, PaddingInput, PaddingParams},
        },
        variable::{ColumnType, Variable},
    },
    error::{AllocationError, AssignmentError, BuildError, CircuitError, ProtocolError},
};
use ark_bn254::Fr as Fp;
use ark_ff::{One, Zero};

#[test]
fn test_composition() {
    let mut runner = TestFramework::<Fp>::default()
        .public_inputs(vec![Fp::from(12u64), Fp::from(4u64), Fp::one()])
        .setup();
    let (x, y, t) = (
        runner.public_input(0),
        runner.public_input(1),
        runner.public_input(2),
    );

    // 12 / 4 = 3, then swap (3, 12) under t = 1, then pad the pair
    let quotient = runner
        .builder()
        .instantiate::<DivisionOrZero>((), &DivisionInput { x, y })
        .unwrap();
    let swapped = runner
        .builder()
        .instantiate::<ArraySwap<Fp>>(
            ArraySwapParams { pairs: 1 },
            &ArraySwapInput {
                t,
                array: vec![quotient.z, x],
            },
        )
        .unwrap();
    let padded = runner
        .builder()
        .instantiate::<Padding<Fp>>(
            PaddingParams {
                num_blocks: 2,
                num_bits: 68,
            },
            &PaddingInput {
                message: swapped.array.clone(),
            },
        )
        .unwrap();

    assert_eq!(runner.value(swapped.array[0]), Fp::from(12u64));
    assert_eq!(runner.value(swapped.array[1]), Fp::from(3u64));
    // (12 << 64 | 3) << 60
    assert_eq!(runner.value(padded.padded_message[0]), Fp::from(12u64 << 60));
    assert_eq!(runner.value(padded.padded_message[1]), Fp::from(3u64 << 60));

    // one row each for division and swap, then 2 rows of padding
    assert_eq!(runner.builder().allocator().cursor(), 4);
    assert_eq!(runner.builder().circuit().gates().len(), 3);
    assert!(runner.builder().circuit().max_degree() <= 2);
    assert!(runner.check().is_ok());
}

#[test]
fn test_finalize_self_check() {
    let mut builder = CircuitBuilder::<Fp>::new(TableConfig::default().self_check(true));
    let inputs = builder
        .assign_public_inputs(&[Fp::from(6u64), Fp::from(2u64)])
        .unwrap();
    let output = builder
        .instantiate::<DivisionOrZero>((), &DivisionInput::from_vars(&inputs).unwrap())
        .unwrap();
    builder
        .table_mut()
        .replace_witness(output.z, Fp::zero())
        .unwrap();

    assert!(matches!(
        builder.finalize(),
        Err(BuildError::Consistency(CircuitError::GateNotSatisfied { .. }))
    ));
}

#[test]
fn test_finalize_hands_over_tables() {
    let mut builder = CircuitBuilder::<Fp>::new(TableConfig::default());
    let inputs = builder
        .assign_public_inputs(&[Fp::from(6u64), Fp::from(2u64)])
        .unwrap();
    builder
        .instantiate::<DivisionOrZero>((), &DivisionInput::from_vars(&inputs).unwrap())
        .unwrap();

    let (circuit, table) = builder.finalize().unwrap();
    assert_eq!(circuit.copy_constraints().len(), 2);
    assert_eq!(circuit.max_degree(), 2);
    assert_eq!(table.public_inputs(), vec![Fp::from(6u64), Fp::from(2u64)]);
    assert!(circuit.verify(&table).is_ok());
}

#[test]
fn test_failed_build_is_not_finalized() {
    let mut builder = CircuitBuilder::<Fp>::new(TableConfig::default().self_check(false));
    let message = builder
        .assign_public_inputs(&[Fp::from(0x1abu64), Fp::zero()])
        .unwrap();
    // 72 bits leave 8 bits for the leading word
    let failure = BuildError::Assignment(AssignmentError::InputOutOfRange {
        component: "padding",
        index: 0,
        bits: 8,
    });
    assert_eq!(
        builder
            .instantiate::<Padding<Fp>>(
                PaddingParams {
                    num_blocks: 2,
                    num_bits: 72,
                },
                &PaddingInput { message },
            )
            .map(|_| ()),
        Err(failure.clone())
    );
    assert_eq!(builder.failure(), Some(&failure));

    // later calls succeed but the build stays failed
    let inputs = builder
        .assign_public_inputs(&[Fp::from(6u64), Fp::from(2u64)])
        .unwrap();
    builder
        .instantiate::<DivisionOrZero>((), &DivisionInput::from_vars(&inputs).unwrap())
        .unwrap();
    assert_eq!(builder.finalize().map(|_| ()), Err(failure));
}

#[test]
fn test_unfinished_build_is_not_finalized() {
    let mut builder = CircuitBuilder::<Fp>::new(TableConfig::default().self_check(false));
    let inputs = builder
        .assign_public_inputs(&[Fp::from(6u64), Fp::from(2u64)])
        .unwrap();
    let input = DivisionInput::from_vars(&inputs).unwrap();
    let mut instance = Instance::<Fp, DivisionOrZero>::declare(());
    builder.allocate(&mut instance).unwrap();
    builder.generate_circuit(&mut instance, &input).unwrap();
    assert_eq!(builder.failure(), None);

    assert_eq!(
        builder.clone().finalize().map(|_| ()),
        Err(BuildError::Protocol(ProtocolError::Unfinished { outstanding: 1 }))
    );

    builder.generate_assignments(&mut instance, &input).unwrap();
    assert!(builder.finalize().is_ok());
}

#[test]
fn test_allocation_failure_reserves_nothing() {
    let mut runner = TestFramework::<Fp>::default()
        .config(TableConfig::default().constant_columns(0))
        .public_inputs(vec![Fp::one()])
        .setup();
    let mut instance = Instance::<Fp, Padding<Fp>>::declare(PaddingParams {
        num_blocks: 1,
        num_bits: 64,
    });
    assert_eq!(
        runner.builder().allocate(&mut instance),
        Err(BuildError::Allocation(AllocationError::NotEnoughColumns {
            kind: ColumnType::Constant,
            needed: 1,
            declared: 0,
        }))
    );
    assert_eq!(instance.state(), InstanceState::Declared);
    assert_eq!(runner.builder().allocator().cursor(), 0);
    assert_eq!(runner.builder().allocator().used_witness_columns(), 0);
}

#[test]
fn test_selector_overflow() {
    let mut runner = TestFramework::<Fp>::default()
        .config(TableConfig::default().selector_columns(1))
        .public_inputs(vec![Fp::one(), Fp::one(), Fp::zero()])
        .setup();
    let (x, y, t) = (
        runner.public_input(0),
        runner.public_input(1),
        runner.public_input(2),
    );
    runner
        .builder()
        .instantiate::<DivisionOrZero>((), &DivisionInput { x, y })
        .unwrap();
    assert_eq!(
        runner
            .builder()
            .instantiate::<ArraySwap<Fp>>(
                ArraySwapParams { pairs: 1 },
                &ArraySwapInput {
                    t,
                    array: vec![x, y]
                }
            )
            .map(|_| ()),
        Err(BuildError::Circuit(CircuitError::SelectorOverflow {
            component: "array_swap".to_string(),
            declared: 1,
        }))
    );
}

#[test]
fn test_public_inputs_append() {
    let mut builder = CircuitBuilder::<Fp>::new(TableConfig::default());
    let first = builder.assign_public_inputs(&[Fp::one()]).unwrap();
    let second = builder
        .assign_public_inputs(&[Fp::from(2u64), Fp::from(3u64)])
        .unwrap();
    assert_eq!(first, vec![Variable::public_input(0, 0)]);
    assert_eq!(
        second,
        vec![Variable::public_input(0, 1), Variable::public_input(0, 2)]
    );
    assert_eq!(
        builder.table().public_inputs(),
        vec![Fp::one(), Fp::from(2u64), Fp::from(3u64)]
    );
}

#[test]
fn test_config_from_json() {
    let config: TableConfig =
        serde_json::from_str(r#"{ "witness_columns": 9, "self_check": true }"#).unwrap();
    let mut runner = TestFramework::<Fp>::default()
        .config(config)
        .public_inputs(vec![Fp::from(7u64)])
        .setup();
    let message = vec![runner.public_input(0)];
    runner
        .builder()
        .instantiate::<Padding<Fp>>(
            PaddingParams {
                num_blocks: 1,
                num_bits: 3,
            },
            &PaddingInput { message },
        )
        .unwrap();
    // only the 9-column layout fits
    assert_eq!(runner.builder().allocator().used_witness_columns(), 9);
    assert!(runner.check().is_ok());
}
