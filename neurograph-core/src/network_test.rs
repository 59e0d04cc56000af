use super::*;
use crate::layer::PrebuiltLayer;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;

/// 2-2-1 linear network with hand-picked weights.
fn small_linear() -> Network {
    let mut network = Network::with_widths(&[2, 2, 1], Transfer::Linear).unwrap();
    network
        .set_weights(vec![
            vec![vec![1.0], vec![1.0]],
            vec![vec![1.0, 0.0, 0.5], vec![0.0, 2.0, 0.0]],
            vec![vec![1.0, 1.0, -1.0]],
        ])
        .unwrap();
    network
}

#[test]
fn test_config_validation() {
    assert!(matches!(
        Network::new(NetworkConfig::default()),
        Err(NeuroGraphError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        Network::new(NetworkConfig::with_widths(&[2, 0, 1])),
        Err(NeuroGraphError::InvalidLayerSpec(_))
    ));
    assert!(Network::new(NetworkConfig::with_widths(&[2, 1]).alpha(0.0)).is_err());
    assert!(Network::new(NetworkConfig::with_widths(&[2, 1]).lambda(-1.0)).is_err());
    assert!(Network::new(NetworkConfig::new(vec![PrebuiltLayer::default().into()])).is_err());
}

#[test]
fn test_topology() {
    let network = Network::with_widths(&[3, 4, 2], Transfer::LogisticSigmoid).unwrap();
    assert_eq!(network.layer_count(), 3);
    assert_eq!(network.input_layer().width(), 3);
    assert_eq!(network.output_layer().width(), 2);
    assert_eq!(network.arena().len(), 9);

    let weights = network.weights().unwrap();
    assert!(weights[0].iter().all(|w| w == &vec![1.0]));
    assert!(weights[1].iter().all(|w| w.len() == 4));
    assert!(weights[2].iter().all(|w| w.len() == 5));
}

#[test]
fn test_output_transfer_override() {
    let config = NetworkConfig::with_widths(&[1, 3, 1])
        .transfer(Transfer::Softplus)
        .output_transfer(Transfer::Linear);
    let network = Network::new(config).unwrap();
    let hidden = network.layer(1).unwrap().unit_ids()[0];
    let output = network.output_layer().unit_ids()[0];
    assert_eq!(network.unit(hidden).unwrap().transfer().name(), "softplus");
    assert_eq!(network.unit(output).unwrap().transfer().name(), "linear");
    // pass-through regardless of the configured transfer
    let input = network.input_layer().unit_ids()[0];
    assert_eq!(network.unit(input).unwrap().transfer().name(), "linear");
}

#[test]
fn test_prebuilt_layer_in_config() {
    let mut hidden = PrebuiltLayer::new(2, Transfer::Linear);
    hidden.unit_mut(0).unwrap().set_transfer(Transfer::Tanh);
    let config = NetworkConfig::new(vec![LayerSpec::Width(1), hidden.into(), LayerSpec::Width(1)]);
    let network = Network::new(config).unwrap();
    let first_hidden = network.layer(1).unwrap().unit_ids()[0];
    assert_eq!(network.unit(first_hidden).unwrap().transfer().name(), "tanh");
    assert_eq!(network.unit(first_hidden).unwrap().input_count(), 2);
}

#[test]
fn test_calc_with_known_weights() {
    let mut network = small_linear();
    // hidden = [x0 + 0.5, 2 x1], out = h0 + h1 - 1
    let outputs = network.calc(Some(&[1.0, 3.0])).unwrap();
    assert_eq!(outputs, vec![6.5]);
    assert_eq!(network.calc(None).unwrap(), vec![6.5]);
}

#[test]
fn test_set_inputs_length_is_checked() {
    let mut network = small_linear();
    assert_eq!(
        network.set_inputs(&[1.0]),
        Err(NeuroGraphError::DimensionMismatch {
            expected: 2,
            actual: 1,
            operation: "Network::set_inputs".to_string(),
        })
    );
    assert!(network.set_expected(&[1.0, 2.0]).is_err());
}

#[test]
fn test_observer_sees_outputs() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut network = small_linear();
    network.set_observer(move |outputs| sink.lock().unwrap().push(outputs.to_vec()));
    network.calc(Some(&[0.0, 0.0])).unwrap();
    network.calc(Some(&[1.0, 3.0])).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![vec![-0.5], vec![6.5]]);

    network.clear_observer();
    network.calc(None).unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn test_sum_sq_error() {
    let mut network = small_linear();
    network
        .forward_propagate(&Trial::new(vec![1.0, 3.0], vec![6.5]))
        .unwrap();
    assert_eq!(network.sum_sq_error().unwrap(), 0.0);

    network
        .forward_propagate(&Trial::new(vec![1.0, 3.0], vec![4.5]))
        .unwrap();
    assert_relative_eq!(network.sum_sq_error().unwrap(), 2.0);
}

#[test]
fn test_back_propagate_order_and_values() {
    let mut network = small_linear();
    network
        .forward_propagate(&Trial::new(vec![1.0, 3.0], vec![4.5]))
        .unwrap();
    let deltas = network.back_propagate().unwrap();
    assert_eq!(deltas.len(), 3);
    assert_eq!(deltas[0], vec![2.0], "output layer first");
    assert_eq!(deltas[1], vec![2.0, 2.0]);
    assert_eq!(deltas[2], vec![2.0, 4.0]);

    let partials = network.input_weight_partials().unwrap();
    assert_eq!(partials[2], vec![vec![3.0, 12.0, 2.0]]);
    assert_eq!(partials[1], vec![vec![2.0, 6.0, 2.0], vec![2.0, 6.0, 2.0]]);

    let outgoing = network.output_weight_partials().unwrap();
    assert_eq!(outgoing[1], vec![vec![3.0], vec![12.0]]);
    assert!(outgoing[2][0].is_empty());
}

#[test]
fn test_weights_round_trip() {
    let mut network = Network::with_widths(&[2, 3, 2], Transfer::LogisticSigmoid).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    network.randomize_weights_with(&mut rng, 0.5, -0.5).unwrap();
    let before = network.calc(Some(&[0.3, -0.7])).unwrap();

    let snapshot = network.weights().unwrap();
    network.set_weights(snapshot.clone()).unwrap();
    assert_eq!(network.weights().unwrap(), snapshot);
    assert_eq!(network.calc(Some(&[0.3, -0.7])).unwrap(), before);

    assert!(network.set_weights(snapshot[..2].to_vec()).is_err());
}

#[test]
fn test_randomize_keeps_pass_through() {
    let mut network = Network::with_widths(&[2, 3, 1], Transfer::LogisticSigmoid).unwrap();
    network.randomize_weights(0.0001, 0.0).unwrap();
    let weights = network.weights().unwrap();
    assert_eq!(weights[0], vec![vec![1.0], vec![1.0]]);
    assert!(weights[1].iter().flatten().all(|w| (0.0..0.0001).contains(w)));

    let mut rng = StdRng::seed_from_u64(1);
    network.randomize_weights_normal(&mut rng, 0.01).unwrap();
    assert_eq!(network.weights().unwrap()[0], vec![vec![1.0], vec![1.0]]);
}

#[test]
fn test_randomize_rejects_bad_bounds() {
    let mut network = Network::with_widths(&[2, 3, 1], Transfer::LogisticSigmoid).unwrap();
    network.randomize_weights(0.5, 0.1).unwrap();
    let before = network.weights().unwrap();

    for (max, min) in [(f64::INFINITY, 0.0), (f64::NAN, 0.0), (0.0, f64::NEG_INFINITY)] {
        assert!(matches!(
            network.randomize_weights(max, min),
            Err(NeuroGraphError::InvalidConfiguration(_))
        ));
    }
    let mut rng = StdRng::seed_from_u64(5);
    assert!(network.randomize_weights_normal(&mut rng, -1.0).is_err());
    assert!(network.randomize_weights_normal(&mut rng, f64::INFINITY).is_err());
    assert_eq!(network.weights().unwrap(), before);
}

#[test]
fn test_set_layer_transfer() {
    let mut network = Network::with_widths(&[1, 2, 1], Transfer::Softplus).unwrap();
    let last = network.layer_count() - 1;
    network.set_layer_transfer(last, Transfer::Linear).unwrap();
    let id = network.output_layer().unit_ids()[0];
    assert_eq!(network.unit(id).unwrap().transfer().name(), "linear");
    assert_eq!(
        network.set_layer_transfer(7, Transfer::Linear),
        Err(NeuroGraphError::IndexOutOfBounds { index: 7, len: 3 })
    );
}
