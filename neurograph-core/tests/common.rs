use neurograph_core::{Network, NetworkConfig, Transfer};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Each integration test binary uses a different subset of these helpers.
#[allow(dead_code)]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Network with small seeded weights, ready for a forward pass.
#[allow(dead_code)]
pub fn random_network(widths: &[usize], transfer: Transfer, seed: u64) -> Network {
    let mut network = Network::new(NetworkConfig::with_widths(widths).transfer(transfer))
        .expect("test network construction failed");
    network
        .randomize_weights_with(&mut seeded_rng(seed), 0.5, -0.5)
        .expect("weight randomization failed");
    network
}
