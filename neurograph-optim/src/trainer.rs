//! Epoch-at-a-time gradient descent.

use log::{debug, info};
use neurograph_core::{Network, NeuroGraphError, Weights};
use neurograph_data::{Dataset, TrainingData};

use crate::alpha::AlphaSchedule;
use crate::options::TrainerOptions;
use crate::report::EpochReport;

/// Trains one network on one data set, one epoch per [`step`](Self::step).
///
/// Nothing runs between steps, so a caller stops training simply by not
/// asking for another epoch. The trainer is also an endless iterator of
/// epoch results.
#[derive(Debug)]
pub struct Trainer<'d> {
    network: Network,
    data: &'d TrainingData,
    options: TrainerOptions,
    schedule: Option<AlphaSchedule>,
    alpha: f64,
    epoch: usize,
    min_error: Option<f64>,
    best_weights: Weights,
}

impl<'d> Trainer<'d> {
    /// # Errors
    /// `EmptyDataset` without trials, `DimensionMismatch` when a trial does
    /// not fit the network, `InvalidConfiguration` for bad options.
    pub fn new(
        network: Network,
        data: &'d TrainingData,
        options: TrainerOptions,
    ) -> Result<Self, NeuroGraphError> {
        options.validate()?;
        if data.is_empty() {
            return Err(NeuroGraphError::EmptyDataset);
        }
        data.check_widths(network.input_width(), network.output_width())?;

        let best_weights = network.weights()?;
        Ok(Trainer {
            network,
            data,
            alpha: options.alpha,
            schedule: options.adaptive.clone().map(AlphaSchedule::new),
            options,
            epoch: 0,
            min_error: None,
            best_weights,
        })
    }

    /// A trainer using the alpha and lambda the network was configured with.
    pub fn from_network(network: Network, data: &'d TrainingData) -> Result<Self, NeuroGraphError> {
        let options = TrainerOptions::from_network(&network);
        Trainer::new(network, data, options)
    }

    /// Number of completed epochs.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Learning rate the next epoch will use.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn lambda(&self) -> f64 {
        self.options.lambda
    }

    /// Lowest epoch error so far, `None` before the first epoch.
    pub fn min_error(&self) -> Option<f64> {
        self.min_error
    }

    pub fn best_weights(&self) -> &Weights {
        &self.best_weights
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn options(&self) -> &TrainerOptions {
        &self.options
    }

    /// Writes the best weights seen so far back into the network.
    pub fn restore_best(&mut self) -> Result<(), NeuroGraphError> {
        self.network.set_weights(self.best_weights.clone())
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Runs one epoch: a forward and backward pass per trial, then a single
    /// weight update with the averaged gradient.
    ///
    /// # Errors
    /// Any network error aborts the epoch. A NaN error or weight gives
    /// `NumericOverflow`. In both cases weights, alpha and the best-so-far
    /// bookkeeping keep their values from before the call.
    pub fn step(&mut self) -> Result<EpochReport, NeuroGraphError> {
        let data = self.data;
        let weights = self.network.weights()?;
        let mut gradient = zeros_like(&weights);
        let mut total_error = 0.0;
        let mut outputs = self
            .options
            .record_outputs
            .then(|| Vec::with_capacity(data.len()));

        for trial in data.iter() {
            let output = self.network.forward_propagate(trial)?;
            total_error += self.network.sum_sq_error()?;
            self.network.back_propagate()?;
            let partials = self.network.input_weight_partials()?;
            accumulate(&mut gradient, &partials);
            if let Some(outputs) = outputs.as_mut() {
                outputs.push(output);
            }
        }

        let count = data.len() as f64;
        let error = (total_error / count).sqrt();
        if error.is_nan() {
            return Err(NeuroGraphError::NumericOverflow {
                operation: format!("error of epoch {}", self.epoch + 1),
                unit: None,
            });
        }

        let updated = self.descend(&weights, &gradient, count)?;
        self.network.set_weights(updated)?;

        self.epoch += 1;
        if self.min_error.map_or(true, |min| error < min) {
            self.min_error = Some(error);
            self.best_weights = weights;
        }
        if let Some(schedule) = self.schedule.as_mut() {
            self.alpha = schedule.adjust(self.alpha, error);
        }

        let min_error = self.min_error.unwrap_or(error);
        if self.options.verbose {
            info!(
                "epoch {}: error {:.6}, min {:.6}, alpha {}",
                self.epoch, error, min_error, self.alpha
            );
        } else {
            debug!(
                "epoch {}: error {:.6}, min {:.6}, alpha {}",
                self.epoch, error, min_error, self.alpha
            );
        }

        Ok(EpochReport {
            epoch: self.epoch,
            error,
            min_error,
            best_weights: self.best_weights.clone(),
            alpha: self.alpha,
            outputs,
        })
    }

    /// `w - alpha * (g / count + lambda * w)` for every layer but the input layer.
    fn descend(&self, weights: &Weights, gradient: &Weights, count: f64) -> Result<Weights, NeuroGraphError> {
        let mut updated = weights.clone();
        for (layer, (layer_weights, layer_gradient)) in
            updated.iter_mut().zip(gradient).enumerate().skip(1)
        {
            for (unit_weights, unit_gradient) in layer_weights.iter_mut().zip(layer_gradient) {
                for (w, g) in unit_weights.iter_mut().zip(unit_gradient) {
                    *w -= self.alpha * (g / count + self.options.lambda * *w);
                    if w.is_nan() {
                        return Err(NeuroGraphError::NumericOverflow {
                            operation: format!("weight update in layer {}", layer),
                            unit: None,
                        });
                    }
                }
            }
        }
        Ok(updated)
    }
}

impl Iterator for Trainer<'_> {
    type Item = Result<EpochReport, NeuroGraphError>;

    /// Always `Some`: training only ends when the caller stops pulling.
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.step())
    }
}

fn zeros_like(weights: &Weights) -> Weights {
    weights
        .iter()
        .map(|layer| layer.iter().map(|unit| vec![0.0; unit.len()]).collect())
        .collect()
}

/// Adds `partials` into `sum`, leaving the input layer at zero.
fn accumulate(sum: &mut Weights, partials: &Weights) {
    for (layer_sum, layer_partials) in sum.iter_mut().zip(partials).skip(1) {
        for (unit_sum, unit_partials) in layer_sum.iter_mut().zip(layer_partials) {
            for (s, p) in unit_sum.iter_mut().zip(unit_partials) {
                *s += p;
            }
        }
    }
}

#[cfg(test)]
#[path = "trainer_test.rs"]
mod tests;
