use neurograph_core::{Network, NetworkConfig, Transfer, TransferRegistry};
use neurograph_data::{TrainingData, Trial};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// `count` samples of `sin(x)` with `x` stepping from 0 towards 1.5.
#[allow(dead_code)]
pub fn sine_data(count: usize) -> TrainingData {
    TrainingData::from_fn(count, |i| {
        let x = 1.5 * i as f64 / count as f64;
        Trial::new(vec![x], vec![x.sin()])
    })
}

/// 1-3-3-1 network: rectifier hidden layers, linear output, tiny seeded weights.
#[allow(dead_code)]
pub fn sine_network(seed: u64) -> Network {
    let registry = TransferRegistry::default();
    let config = NetworkConfig::with_widths(&[1, 3, 3, 1])
        .transfer_named(&registry, "rectifier")
        .expect("rectifier is a built-in transfer")
        .output_transfer(Transfer::Linear)
        .alpha(0.01)
        .lambda(0.0001);
    let mut network = Network::new(config).expect("sine network construction failed");
    network
        .randomize_weights_with(&mut StdRng::seed_from_u64(seed), 0.0001, 0.0)
        .expect("weight randomization failed");
    network
}

#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
