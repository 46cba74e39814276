use super::framework::{TestFramework, TestRunner};
use crate::{
    circuits::{
        builder::CircuitBuilder,
        component::{Component, Instance},
        config::TableConfig,
        lookup::tables::range_table_id,
        polynomials::padding::{
            self,
            layout::{LayoutPreset, PaddingLayout},
            Padding, PaddingInput, PaddingOutput, PaddingParams,
        },
        variable::Variable,
        window::Window,
    },
    error::{AssignmentError, BuildError, CircuitError, ConstructionError, ShapeError},
};
use ark_bn254::Fr as Fp;
use blueprint_utils::FieldHelpers;
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::IntoEnumIterator;

const RNG_SEED: [u8; 32] = [7; 32];

fn pad(
    builder: &mut CircuitBuilder<Fp>,
    instance: &mut Instance<Fp, Padding<Fp>>,
    input: &PaddingInput,
) -> Result<PaddingOutput, BuildError> {
    builder.allocate(instance)?;
    builder.generate_circuit(instance, input)?;
    builder.generate_assignments(instance, input)
}

/// Pads `message` over `columns` witness columns (negotiated when `None`)
fn run_test(
    columns: Option<usize>,
    message: &[u64],
    num_bits: usize,
) -> (Result<Vec<Fp>, BuildError>, TestRunner<Fp>) {
    let mut runner = TestFramework::<Fp>::default()
        .public_inputs(message.iter().copied().map(Fp::from).collect())
        .setup();
    let input = PaddingInput {
        message: runner.public_inputs().to_vec(),
    };
    let params = PaddingParams {
        num_blocks: message.len(),
        num_bits,
    };
    let mut instance = match columns {
        Some(columns) => Instance::<Fp, Padding<Fp>>::declare_with_columns(params, columns),
        None => Instance::declare(params),
    };

    let padded = pad(runner.builder(), &mut instance, &input).map(|output| {
        output
            .padded_message
            .iter()
            .map(|var| runner.value(*var))
            .collect()
    });
    (padded, runner)
}

fn words(words: &[u64]) -> Vec<Fp> {
    words.iter().copied().map(Fp::from).collect()
}

#[test]
fn test_padding() {
    for preset in LayoutPreset::iter() {
        let (padded, runner) = run_test(
            Some(preset.columns()),
            &[0xab, 0x0123_4567_89ab_cdef],
            72,
        );
        assert_eq!(
            padded,
            Ok(words(&[0xab01_2345_6789_abcd, 0xef00_0000_0000_0000]))
        );
        assert!(runner.check().is_ok(), "{preset:?}");
    }
}

#[test]
fn test_round_trip() {
    let message = [0x1f, 0xdead_beef_0000_0001, 0x0123_4567_89ab_cdef];
    let num_bits = 133;
    let (padded, runner) = run_test(None, &message, num_bits);
    let shift = 64 * message.len() - num_bits;

    let concat = |words: &[BigUint]| {
        words
            .iter()
            .fold(BigUint::from(0u8), |acc, word| (acc << 64) + word)
    };
    let m = concat(&message.iter().map(|w| BigUint::from(*w)).collect::<Vec<_>>());
    let padded = concat(
        &padded
            .unwrap()
            .iter()
            .map(|word| word.to_biguint())
            .collect::<Vec<_>>(),
    );
    assert_eq!(padded.clone() >> shift, m);
    assert_eq!(padded, m << shift);
    assert!(runner.check().is_ok());
}

#[test]
fn test_aligned_message() {
    let message = [u64::MAX, 1, 2, 3];
    let (padded, runner) = run_test(None, &message, 256);
    assert_eq!(padded, Ok(words(&message)));
    assert!(runner.check().is_ok());
}

#[test]
fn test_random_messages() {
    let rng = &mut StdRng::from_seed(RNG_SEED);
    for preset in LayoutPreset::iter() {
        // crosses one, two and three strides
        for num_blocks in [1, 4, 5, 9, 11] {
            let shift: usize = rng.gen_range(0..64);
            let mut message: Vec<u64> = (0..num_blocks).map(|_| rng.gen()).collect();
            message[0] >>= shift;
            let num_bits = 64 * num_blocks - shift;

            let (padded, runner) = run_test(Some(preset.columns()), &message, num_bits);
            let expected = padding::calculate(&message, num_bits).unwrap();
            assert_eq!(padded, Ok(words(&expected)), "{preset:?} {num_blocks} {shift}");
            assert!(runner.check().is_ok(), "{preset:?} {num_blocks} {shift}");
        }
    }
}

#[test]
fn test_negotiated_preset() {
    let (_, mut runner) = run_test(None, &[1], 1);
    let gates = runner.builder().circuit().gates().len();
    assert_eq!(gates, 1);
    // default tables have 15 witness columns
    assert_eq!(runner.builder().allocator().used_witness_columns(), 15);
}

#[test]
fn test_negotiation_respects_table_width() {
    // 12 columns only leave room for the 9-column layout
    let mut runner = TestFramework::<Fp>::default()
        .config(TableConfig::default().witness_columns(12))
        .public_inputs(words(&[1]))
        .setup();
    let message = runner.public_inputs().to_vec();
    runner
        .builder()
        .instantiate::<Padding<Fp>>(
            PaddingParams {
                num_blocks: 1,
                num_bits: 1,
            },
            &PaddingInput { message },
        )
        .unwrap();
    assert_eq!(runner.builder().allocator().used_witness_columns(), 9);
    assert!(runner.check().is_ok());
}

#[test]
fn test_unsupported_preset() {
    let (padded, _) = run_test(Some(10), &[1], 64);
    assert_eq!(
        padded,
        Err(BuildError::Construction(ConstructionError::UnsupportedPreset {
            component: "padding",
            columns: 10,
        }))
    );

    let window = Window::contiguous(10, 1, 0);
    assert!(matches!(
        <Padding<Fp> as Component<Fp>>::new(
            window,
            PaddingParams {
                num_blocks: 1,
                num_bits: 64
            }
        ),
        Err(ConstructionError::UnsupportedPreset { columns: 10, .. })
    ));
}

#[test]
fn test_invalid_params() {
    let (padded, _) = run_test(None, &[1, 2], 64);
    assert_eq!(
        padded,
        Err(BuildError::Shape(ShapeError::BitsOutOfRange {
            num_bits: 64,
            num_blocks: 2
        }))
    );
}

#[test]
fn test_leading_word_too_wide() {
    // 72 bits leave 8 bits for the leading word
    let (padded, _) = run_test(None, &[0x1ab, 0], 72);
    assert_eq!(
        padded,
        Err(BuildError::Assignment(AssignmentError::InputOutOfRange {
            component: "padding",
            index: 0,
            bits: 8,
        }))
    );
}

#[test]
fn test_wrong_arity() {
    let mut runner = TestFramework::<Fp>::default()
        .public_inputs(words(&[1, 2]))
        .setup();
    let input = PaddingInput {
        message: runner.public_inputs().to_vec(),
    };
    let params = PaddingParams {
        num_blocks: 3,
        num_bits: 192,
    };
    assert_eq!(
        runner
            .builder()
            .instantiate::<Padding<Fp>>(params, &input)
            .map(|_| ()),
        Err(BuildError::Construction(ConstructionError::WrongArity {
            component: "padding",
            expected: 3,
            got: 2,
        }))
    );

    // rejected before anything was placed
    let builder = runner.builder();
    assert_eq!(builder.allocator().cursor(), 0);
    assert_eq!(builder.allocator().used_witness_columns(), 0);
    assert!(builder.circuit().gates().is_empty());
    assert_eq!(builder.circuit().lookup_tables().count(), 0);
    assert!(builder.table().enabled_rows(0).is_empty());
}

proptest! {
    #[test]
    fn test_manifest_is_stable(
        num_blocks in 1usize..40,
        spare in 0usize..64,
        preset: LayoutPreset,
    ) {
        let params = PaddingParams {
            num_blocks,
            num_bits: 64 * num_blocks - spare,
        };
        let manifest = <Padding<Fp> as Component<Fp>>::manifest;
        let first = manifest(&params, preset.columns());
        prop_assert_eq!(&first, &manifest(&params, preset.columns()));
        prop_assert!(first.is_ok());
        prop_assert_eq!(
            <Padding<Fp> as Component<Fp>>::requirement(&params),
            <Padding<Fp> as Component<Fp>>::requirement(&params)
        );
    }
}

#[test]
fn test_split_out_of_range() {
    // move one unit of the high part of step 1 into its low part, which then
    // overflows its 8 bits while every constraint still holds
    let (padded, runner) = run_test(Some(15), &[0xab, 0x0123_4567_89ab_cdef], 72);
    assert!(padded.is_ok());

    let cell = |col| Variable::witness(col, 0);
    let res = runner
        .invalidate(cell(6), Fp::from(0x0123_4567_89ab_ccu64))
        .invalidate(cell(7), Fp::from(0x1efu64))
        .invalidate(cell(8), Fp::from(0xab01_2345_6789_abccu64))
        .invalidate(cell(12), Fp::from(0x1efu128 << 56))
        .check();
    assert!(matches!(
        res,
        Err(BuildError::Consistency(CircuitError::LookupFailed {
            row: 0,
            lookup: 3,
            table,
            ..
        })) if table == range_table_id(8)
    ));
}

#[test]
fn test_broken_carry() {
    let (_, runner) = run_test(Some(9), &[0xab, 0x0123_4567_89ab_cdef], 72);
    // sum of step 1 in the 9-column layout
    let res = runner.invalidate(Variable::witness(8, 0), Fp::from(1u64)).check();
    assert!(matches!(
        res,
        Err(BuildError::Consistency(CircuitError::GateNotSatisfied {
            row: 0,
            constraint: 3,
            ..
        }))
    ));
}

#[test]
fn test_gates_shared_by_shift() {
    let mut runner = TestFramework::<Fp>::default()
        .public_inputs(words(&[1, 2, 3, 4, 5, 6]))
        .setup();
    let inputs = runner.public_inputs().to_vec();
    let pad = |runner: &mut TestRunner<Fp>, message: &[Variable], num_bits| {
        runner
            .builder()
            .instantiate::<Padding<Fp>>(
                PaddingParams {
                    num_blocks: message.len(),
                    num_bits,
                },
                &PaddingInput {
                    message: message.to_vec(),
                },
            )
            .unwrap()
    };

    // same shift of 8 with two and three blocks
    pad(&mut runner, &inputs[..2], 120);
    pad(&mut runner, &inputs[2..5], 184);
    assert_eq!(runner.builder().circuit().gates().len(), 1);

    // a different shift needs its own gate
    pad(&mut runner, &inputs[5..], 60);
    assert_eq!(runner.builder().circuit().gates().len(), 2);
    assert!(runner.check().is_ok());
}

#[test]
fn test_empty_assignments() {
    let mut runner = TestFramework::<Fp>::default()
        .public_inputs(words(&[0xab, 0x0123_4567_89ab_cdef]))
        .setup();
    let input = PaddingInput {
        message: runner.public_inputs().to_vec(),
    };
    let mut instance = Instance::<Fp, Padding<Fp>>::declare(PaddingParams {
        num_blocks: 2,
        num_bits: 72,
    });
    runner.builder().allocate(&mut instance).unwrap();
    let output = runner
        .builder()
        .generate_empty_assignments(&mut instance, &input)
        .unwrap();

    let padded: Vec<Fp> = output
        .padded_message
        .iter()
        .map(|var| runner.value(*var))
        .collect();
    assert_eq!(padded, words(&[0xab01_2345_6789_abcd, 0xef00_0000_0000_0000]));

    let layout: &PaddingLayout = instance.component().unwrap().layout();
    let (row, col) = layout.steps[0].value;
    assert!(!runner
        .builder()
        .table()
        .is_assigned(&Variable::witness(col, row)));
}
