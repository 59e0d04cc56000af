use super::*;
use crate::transfer::Transfer;
use crate::unit::Input;
use approx::assert_relative_eq;

/// `source` (pass-through of 2.0) feeding `sink` (0.5 * source + 0.25 * bias).
fn two_unit_chain() -> (UnitArena, UnitId, UnitId) {
    let mut arena = UnitArena::new();
    let source = arena.insert(
        Unit::with_inputs(Transfer::Linear, vec![Input::Constant(2.0)], vec![1.0]).unwrap(),
    );
    let sink = arena.insert(
        Unit::with_inputs(
            Transfer::Linear,
            vec![Input::Unit(source), Input::Constant(1.0)],
            vec![0.5, 0.25],
        )
        .unwrap(),
    );
    arena.get_mut(source).unwrap().update_output_units(vec![sink]);
    (arena, source, sink)
}

#[test]
fn test_insert_assigns_ids() {
    let (arena, source, sink) = two_unit_chain();
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.get(source).unwrap().id(), Some(UnitId(0)));
    assert_eq!(arena.get(sink).unwrap().id(), Some(UnitId(1)));
    assert_eq!(arena.get(UnitId(5)).unwrap_err(), NeuroGraphError::UnitNotFound(5));
}

#[test]
fn test_calc_recurses_through_upstream_units() {
    let (mut arena, source, sink) = two_unit_chain();
    assert_relative_eq!(arena.calc(sink).unwrap(), 1.25);
    assert_eq!(arena.get(source).unwrap().activation(), Some(2.0));
}

#[test]
fn test_calc_uses_cache_until_invalidated() {
    let (mut arena, source, sink) = two_unit_chain();
    arena.calc(sink).unwrap();
    arena.get_mut(source).unwrap().set_inputs(vec![Input::Constant(4.0)]);
    assert_relative_eq!(arena.calc(sink).unwrap(), 1.25, epsilon = 1e-12);
    arena.invalidate(sink).unwrap();
    assert_relative_eq!(arena.calc(sink).unwrap(), 2.25);
}

#[test]
fn test_deltas_and_partials() {
    let (mut arena, source, sink) = two_unit_chain();
    arena.get_mut(sink).unwrap().set_expected(1.0).unwrap();
    arena.calc(sink).unwrap();

    assert_relative_eq!(arena.calc_delta(sink).unwrap(), 0.25);
    // hidden: derivative 1 * (sink.delta * weight of source in sink)
    assert_relative_eq!(arena.calc_delta(source).unwrap(), 0.125);

    let partials = arena.input_weight_partials(sink).unwrap();
    assert_relative_eq!(partials[0], 0.5);
    assert_relative_eq!(partials[1], 0.25);
    assert_eq!(arena.output_weight_partials(source).unwrap(), vec![0.5]);
}

#[test]
fn test_hidden_delta_uses_position_in_consumer_inputs() {
    let mut arena = UnitArena::new();
    let a = arena.insert(Unit::with_inputs(Transfer::Linear, vec![1.0.into()], vec![1.0]).unwrap());
    let b = arena.insert(Unit::with_inputs(Transfer::Linear, vec![3.0.into()], vec![1.0]).unwrap());
    // consumer lists b before a
    let out = arena.insert(
        Unit::with_inputs(Transfer::Linear, vec![b.into(), a.into()], vec![10.0, 100.0]).unwrap(),
    );
    arena.get_mut(a).unwrap().update_output_units(vec![out]);
    arena.get_mut(b).unwrap().update_output_units(vec![out]);
    arena.get_mut(out).unwrap().set_expected(0.0).unwrap();
    arena.calc(out).unwrap();
    let out_delta = arena.calc_delta(out).unwrap();
    assert_relative_eq!(arena.calc_delta(a).unwrap(), out_delta * 100.0);
    assert_relative_eq!(arena.calc_delta(b).unwrap(), out_delta * 10.0);
}

#[test]
fn test_inconsistent_wiring_is_reported() {
    let (mut arena, source, _sink) = two_unit_chain();
    let stray = arena.insert(Unit::with_inputs(Transfer::Linear, vec![1.0.into()], vec![1.0]).unwrap());
    arena.get_mut(source).unwrap().update_output_units(vec![stray]);
    arena.get_mut(stray).unwrap().set_expected(0.0).unwrap();
    arena.calc(stray).unwrap();
    arena.calc(source).unwrap();
    arena.calc_delta(stray).unwrap();
    assert!(matches!(
        arena.calc_delta(source),
        Err(NeuroGraphError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_cycle_detection() {
    let mut arena = UnitArena::new();
    let a = arena.insert(Unit::new(Transfer::Linear));
    arena.get_mut(a).unwrap().set_inputs(vec![Input::Unit(a)]);
    assert_eq!(arena.calc(a), Err(NeuroGraphError::CycleDetected(0)));
    // the failed attempt must not leave the unit stuck
    arena.get_mut(a).unwrap().set_inputs(vec![Input::Constant(1.0)]);
    arena.get_mut(a).unwrap().set_weights(vec![3.0]).unwrap();
    assert_eq!(arena.calc(a), Ok(3.0));
}
