use super::*;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_unit_creation() {
    let unit = Unit::with_inputs(
        Transfer::Linear,
        vec![Input::callback(|| 3.0), Input::Constant(1.0)],
        vec![1.0, 1.0],
    )
    .unwrap();
    assert_eq!(unit.input_count(), 2);
    assert!(unit.is_output());
    assert_eq!(unit.id(), None);
    assert_eq!(unit.transfer().name(), "linear");
}

#[test]
fn test_weight_count_follows_input_count() {
    let mut unit = Unit::new(Transfer::Linear);
    for n in [3usize, 1, 5, 0, 2] {
        unit.set_inputs((0..n).map(|i| Input::Constant(i as f64)).collect());
        assert_eq!(unit.weights().len(), n);
        assert_eq!(unit.input_count(), n);
    }
}

#[test]
fn test_resizing_inputs_resets_weights() {
    let mut unit =
        Unit::with_inputs(Transfer::Linear, vec![1.0.into(), 2.0.into()], vec![0.3, 0.4]).unwrap();
    unit.set_inputs(vec![5.0.into(), 6.0.into()]);
    assert_eq!(unit.weights(), &[0.3, 0.4], "same count keeps weights");
    unit.set_inputs(vec![5.0.into(), 6.0.into(), 7.0.into()]);
    assert_eq!(unit.weights(), &[0.0, 0.0, 0.0]);
}

#[test]
fn test_add_input_appends_zero_weight() {
    let mut unit = Unit::with_inputs(Transfer::Linear, vec![2.0.into()], vec![1.0]).unwrap();
    assert_eq!(unit.calc().unwrap(), 2.0);
    unit.add_input(Input::Constant(1.0));
    assert_eq!(unit.weights(), &[1.0, 0.0]);
    assert_eq!(unit.activation(), None, "adding an input clears the cache");
}

#[test]
fn test_set_weights_length_mismatch() {
    let mut unit = Unit::with_inputs(Transfer::Linear, vec![1.0.into()], vec![1.0]).unwrap();
    match unit.set_weights(vec![1.0, 2.0]) {
        Err(NeuroGraphError::DimensionMismatch { expected, actual, .. }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("Expected DimensionMismatch, got {:?}", other),
    }
}

#[test]
fn test_linear_identity_calc() {
    for x in [-2.5, 0.0, 0.125, 42.0] {
        let mut unit = Unit::with_inputs(Transfer::Linear, vec![x.into()], vec![1.0]).unwrap();
        assert_eq!(unit.calc().unwrap(), x);
    }
}

#[test]
fn test_calc_is_cached_until_invalidated() {
    let mut unit = Unit::with_inputs(
        Transfer::LogisticSigmoid,
        vec![Input::Constant(0.7), Input::Constant(1.0)],
        vec![0.4, -0.2],
    )
    .unwrap();
    let first = unit.calc().unwrap();
    let second = unit.calc().unwrap();
    assert_eq!(first, second);
    assert_relative_eq!(unit.input_sum().unwrap(), 0.7 * 0.4 - 0.2);
    assert_relative_eq!(unit.transfer().apply(unit.input_sum().unwrap()), first);

    unit.set_weights(vec![1.0, 1.0]).unwrap();
    assert_eq!(unit.activation(), None);
    assert_relative_eq!(unit.calc().unwrap(), Transfer::LogisticSigmoid.apply(1.7));
}

#[test]
fn test_error_and_output_delta() {
    let mut unit =
        Unit::with_inputs(Transfer::Linear, vec![1.0.into(), 2.0.into()], vec![1.0, 2.0]).unwrap();
    unit.calc().unwrap();
    unit.set_expected(5.0).unwrap();
    assert_eq!(unit.error().unwrap(), 0.0);

    unit.set_expected(4.0).unwrap();
    assert_eq!(unit.error().unwrap(), 1.0);
    assert_eq!(unit.calc_output_delta().unwrap(), 1.0);
    assert_eq!(unit.delta(), 1.0);
}

#[test]
fn test_error_requires_expected() {
    let mut unit = Unit::with_inputs(Transfer::Linear, vec![1.0.into()], vec![1.0]).unwrap();
    unit.calc().unwrap();
    assert!(matches!(
        unit.error(),
        Err(NeuroGraphError::MissingValue { what: "expected value", .. })
    ));
}

#[test]
fn test_output_delta_nan_is_an_error() {
    let mut unit = Unit::with_inputs(Transfer::Linear, vec![f64::NAN.into()], vec![1.0]).unwrap();
    unit.calc().unwrap();
    unit.set_expected(1.0).unwrap();
    assert!(matches!(
        unit.calc_output_delta(),
        Err(NeuroGraphError::NumericOverflow { .. })
    ));
}

#[test]
fn test_update_output_units_clears_expected() {
    let mut unit = Unit::new(Transfer::Linear);
    unit.set_expected(1.0).unwrap();
    unit.update_output_units(vec![UnitId(4)]);
    assert!(!unit.is_output());
    assert_eq!(unit.expected(), None);
    assert!(unit.set_expected(2.0).is_err());
}

#[test]
fn test_calc_rejects_unit_inputs_without_arena() {
    let mut unit = Unit::with_inputs(Transfer::Linear, vec![UnitId(0).into()], vec![1.0]).unwrap();
    assert_eq!(unit.calc(), Err(NeuroGraphError::UnitNotFound(0)));
}

#[test]
fn test_randomize_weights_range() {
    let mut unit = Unit::new(Transfer::Linear);
    unit.set_inputs(vec![Input::Constant(1.0); 50]);
    let mut rng = StdRng::seed_from_u64(7);
    unit.randomize_weights_with(&mut rng, 0.5, -0.5).unwrap();
    assert!(unit.weights().iter().all(|w| (-0.5..0.5).contains(w)));
    assert!(unit.weights().iter().any(|&w| w != 0.0));

    // arguments in either order describe the same interval
    unit.randomize_weights(-1.0, 1.0).unwrap();
    assert!(unit.weights().iter().all(|w| (-1.0..1.0).contains(w)));
}

#[test]
fn test_randomize_weights_normal() {
    let mut unit = Unit::new(Transfer::Linear);
    unit.set_inputs(vec![Input::Constant(1.0); 20]);
    let mut rng = StdRng::seed_from_u64(11);
    unit.randomize_weights_normal(&mut rng, 0.01).unwrap();
    assert!(unit.weights().iter().all(|w| w.abs() < 0.1));
    let drawn = unit.weights().to_vec();
    assert!(matches!(
        unit.randomize_weights_normal(&mut rng, -1.0),
        Err(NeuroGraphError::InvalidConfiguration(_))
    ));
    assert!(unit.randomize_weights_normal(&mut rng, f64::NAN).is_err());
    assert_eq!(unit.weights(), &drawn[..]);
}

#[test]
fn test_randomize_weights_rejects_unbounded_range() {
    let mut unit = Unit::new(Transfer::Linear);
    unit.set_inputs(vec![Input::Constant(1.0); 3]);
    let mut rng = StdRng::seed_from_u64(3);
    let unbounded = [
        (f64::INFINITY, 0.0),
        (f64::NAN, 0.0),
        (1.0, f64::NEG_INFINITY),
        (f64::MAX, -f64::MAX),
    ];
    for (max, min) in unbounded {
        assert!(matches!(
            unit.randomize_weights_with(&mut rng, max, min),
            Err(NeuroGraphError::InvalidConfiguration(_))
        ));
    }
    assert_eq!(unit.weights(), &[0.0, 0.0, 0.0]);
}

#[test]
fn test_input_position() {
    let unit = Unit::with_inputs(
        Transfer::Linear,
        vec![UnitId(3).into(), UnitId(9).into(), Input::Constant(1.0)],
        vec![0.0; 3],
    )
    .unwrap();
    assert_eq!(unit.input_position(UnitId(9)), Some(1));
    assert_eq!(unit.input_position(UnitId(4)), None);
}
