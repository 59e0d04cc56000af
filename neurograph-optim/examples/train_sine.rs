//! Fits `sin(x)` with a small 1-3-3-1 network.
//!
//! Hidden layers use the rectifier transfer and the output layer is linear.
//! Training runs with a progressive learning rate until the error drops below
//! a target or the epoch limit is reached, then the best weights are restored.
//!
//! Run with:
//! `RUST_LOG=info cargo run -p neurograph-optim --example train_sine`

use log::info;
use neurograph_core::{Network, NetworkConfig, NeuroGraphError, Transfer, TransferRegistry};
use neurograph_data::{TrainingData, Trial};
use neurograph_optim::{AdaptiveAlpha, Trainer, TrainerOptions};

const SAMPLES: usize = 100;
const MAX_EPOCHS: usize = 5000;
const TARGET_ERROR: f64 = 0.01;

fn sine_data(count: usize) -> TrainingData {
    TrainingData::from_fn(count, |i| {
        let x = 9.0 - 20.0 * i as f64 / count as f64;
        Trial::new(vec![x], vec![x.sin()])
    })
}

fn main() -> Result<(), NeuroGraphError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let registry = TransferRegistry::default();
    let config = NetworkConfig::with_widths(&[1, 3, 3, 1])
        .transfer_named(&registry, "rectifier")?
        .output_transfer(Transfer::Linear)
        .alpha(0.01)
        .lambda(0.0001);
    let mut network = Network::new(config)?;
    network.randomize_weights(0.0001, 0.0)?;

    let data = sine_data(SAMPLES);
    let options = TrainerOptions::from_network(&network)
        .adaptive(AdaptiveAlpha::new(1.01, 0.5))
        .record_outputs(true);
    let mut trainer = Trainer::new(network, &data, options)?;

    let mut last = None;
    for report in trainer.by_ref().take(MAX_EPOCHS) {
        let report = report?;
        if report.epoch % 100 == 0 {
            info!(
                "epoch {:>5}  error {:.5}  min {:.5}  alpha {:.6}",
                report.epoch, report.error, report.min_error, report.alpha
            );
        }
        let done = report.error < TARGET_ERROR;
        last = Some(report);
        if done {
            break;
        }
    }

    trainer.restore_best()?;
    if let Some(report) = last {
        info!(
            "stopped after {} epochs, best error {:.5}",
            report.epoch, report.min_error
        );
        if let Some(outputs) = report.outputs {
            for (trial, output) in data.iter().zip(outputs).step_by(SAMPLES / 10) {
                info!(
                    "x = {:>6.2}  sin(x) = {:>6.3}  network = {:>6.3}",
                    trial.inputs[0], trial.outputs[0], output[0]
                );
            }
        }
    }
    Ok(())
}
