//! Whole-graph operations over a stack of plugged layers.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use rand::Rng;

use crate::arena::UnitArena;
use crate::config::{LayerSpec, NetworkConfig};
use crate::error::NeuroGraphError;
use crate::layer::Layer;
use crate::transfer::Transfer;
use crate::trial::Trial;
use crate::unit::{self, Input, Unit, UnitId};

/// Full weight snapshot: layer, then unit, then per-input weight (bias last).
pub type Weights = Vec<Vec<Vec<f64>>>;

/// Called with the output vector of every [`Network::calc`].
pub type Observer = Arc<dyn Fn(&[f64]) + Send + Sync>;

/// A feed-forward network.
///
/// Layer 0 is a pass-through: each of its units forwards one network input
/// with a fixed weight of 1. Every later layer receives all units of the
/// previous layer plus a constant bias input.
#[derive(Clone)]
pub struct Network {
    arena: UnitArena,
    layers: Vec<Layer>,
    alpha: f64,
    lambda: f64,
    observer: Option<Observer>,
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("layers", &self.layers)
            .field("units", &self.arena.len())
            .field("alpha", &self.alpha)
            .field("lambda", &self.lambda)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Network {
    /// Builds and wires the network described by `config`.
    ///
    /// Weights start at zero (plugging resets them); call
    /// [`randomize_weights`](Self::randomize_weights) before training.
    ///
    /// # Errors
    /// `InvalidConfiguration` or `InvalidLayerSpec` for a malformed config.
    pub fn new(config: NetworkConfig) -> Result<Self, NeuroGraphError> {
        config.validate()?;
        let NetworkConfig {
            layers: specs,
            transfer,
            output_transfer,
            alpha,
            lambda,
        } = config;

        let mut arena = UnitArena::new();
        let last = specs.len() - 1;
        let mut layers: Vec<Layer> = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            let layer = match spec {
                LayerSpec::Width(width) => {
                    let t = match (&output_transfer, index == last) {
                        (Some(out), true) => out,
                        _ => &transfer,
                    };
                    Layer::new(&mut arena, width, t)
                }
                LayerSpec::Prebuilt(prebuilt) => prebuilt.into_layer(&mut arena),
            };
            layers.push(layer);
        }

        for i in 1..layers.len() {
            let (upstream, downstream) = layers.split_at_mut(i);
            upstream[i - 1].plug(&mut downstream[0], &mut arena)?;
        }

        let zeros = vec![Input::Constant(0.0); layers[0].width()];
        layers[0].set_inputs(&mut arena, &zeros, true)?;

        info!(
            "built network with layer widths {:?} ({} units)",
            layers.iter().map(Layer::width).collect::<Vec<_>>(),
            arena.len()
        );
        Ok(Network {
            arena,
            layers,
            alpha,
            lambda,
            observer: None,
        })
    }

    /// Shorthand for `Network::new(NetworkConfig::with_widths(widths).transfer(transfer))`.
    pub fn with_widths(widths: &[usize], transfer: Transfer) -> Result<Self, NeuroGraphError> {
        Network::new(NetworkConfig::with_widths(widths).transfer(transfer))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Result<&Layer, NeuroGraphError> {
        self.layers.get(index).ok_or(NeuroGraphError::IndexOutOfBounds {
            index,
            len: self.layers.len(),
        })
    }

    pub fn input_layer(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn input_width(&self) -> usize {
        self.input_layer().width()
    }

    pub fn output_width(&self) -> usize {
        self.output_layer().width()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit, NeuroGraphError> {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &UnitArena {
        &self.arena
    }

    /// Replaces the transfer of every unit in one layer.
    pub fn set_layer_transfer(&mut self, index: usize, transfer: Transfer) -> Result<(), NeuroGraphError> {
        let len = self.layers.len();
        let layer = self
            .layers
            .get(index)
            .ok_or(NeuroGraphError::IndexOutOfBounds { index, len })?;
        layer.set_transfer(&mut self.arena, &transfer)?;
        Ok(())
    }

    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: Fn(&[f64]) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Feeds `values` to the input layer.
    ///
    /// # Errors
    /// `DimensionMismatch` if `values.len()` is not the input width.
    pub fn set_inputs(&mut self, values: &[f64]) -> Result<(), NeuroGraphError> {
        if values.len() != self.input_width() {
            return Err(NeuroGraphError::DimensionMismatch {
                expected: self.input_width(),
                actual: values.len(),
                operation: "Network::set_inputs".to_string(),
            });
        }
        let inputs: Vec<Input> = values.iter().map(|&v| Input::Constant(v)).collect();
        self.layers[0].set_inputs(&mut self.arena, &inputs, true)
    }

    /// Assigns target values to the output layer.
    pub fn set_expected(&mut self, values: &[f64]) -> Result<(), NeuroGraphError> {
        let last = self.layers.len() - 1;
        self.layers[last].set_outputs(&mut self.arena, values)
    }

    pub fn invalidate(&mut self) -> Result<(), NeuroGraphError> {
        for layer in &self.layers {
            layer.invalidate(&mut self.arena)?;
        }
        Ok(())
    }

    /// Recomputes every unit and returns the output layer's activations.
    ///
    /// With `inputs`, they are fed to the input layer first. The observer, if
    /// any, sees the result.
    pub fn calc(&mut self, inputs: Option<&[f64]>) -> Result<Vec<f64>, NeuroGraphError> {
        if let Some(values) = inputs {
            self.set_inputs(values)?;
        }
        let outputs = self.recompute()?;
        if let Some(observer) = &self.observer {
            observer(&outputs);
        }
        Ok(outputs)
    }

    fn recompute(&mut self) -> Result<Vec<f64>, NeuroGraphError> {
        self.invalidate()?;
        let last = self.layers.len() - 1;
        self.layers[last].calc(&mut self.arena)
    }

    /// Evaluates one example: inputs, expected values, then a full `calc`.
    pub fn forward_propagate(&mut self, trial: &Trial) -> Result<Vec<f64>, NeuroGraphError> {
        self.invalidate()?;
        self.set_inputs(&trial.inputs)?;
        self.set_expected(&trial.outputs)?;
        self.calc(None)
    }

    /// `0.5 * Σ error²` over the output units for the last evaluation.
    pub fn sum_sq_error(&self) -> Result<f64, NeuroGraphError> {
        let mut total = 0.0;
        for &id in self.output_layer().unit_ids() {
            let error = self.arena.get(id)?.error()?;
            total += error * error;
        }
        Ok(0.5 * total)
    }

    /// Recomputes the forward pass, then the deltas of every layer from the
    /// output layer back to the input layer.
    ///
    /// Returns the delta vectors in that order, output layer first.
    pub fn back_propagate(&mut self) -> Result<Vec<Vec<f64>>, NeuroGraphError> {
        self.recompute()?;
        self.layers
            .iter()
            .rev()
            .map(|layer| layer.calc_deltas(&mut self.arena))
            .collect()
    }

    /// `dE/dw` for every weight, shaped like [`weights`](Self::weights).
    pub fn input_weight_partials(&mut self) -> Result<Weights, NeuroGraphError> {
        self.layers
            .iter()
            .map(|layer| layer.input_weight_partials(&mut self.arena))
            .collect()
    }

    /// For every unit, its activation times the delta of each consumer.
    pub fn output_weight_partials(&self) -> Result<Weights, NeuroGraphError> {
        self.layers
            .iter()
            .map(|layer| layer.output_weight_partials(&self.arena))
            .collect()
    }

    pub fn weights(&self) -> Result<Weights, NeuroGraphError> {
        self.layers
            .iter()
            .map(|layer| layer.weights(&self.arena))
            .collect()
    }

    /// Restores a snapshot taken with [`weights`](Self::weights).
    ///
    /// # Errors
    /// `DimensionMismatch` at the first level whose length disagrees with the
    /// topology. Layers before the mismatch have already been written.
    pub fn set_weights(&mut self, weights: Weights) -> Result<(), NeuroGraphError> {
        if weights.len() != self.layers.len() {
            return Err(NeuroGraphError::DimensionMismatch {
                expected: self.layers.len(),
                actual: weights.len(),
                operation: "Network::set_weights".to_string(),
            });
        }
        for (layer, layer_weights) in self.layers.iter().zip(weights) {
            layer.set_weights(&mut self.arena, layer_weights)?;
        }
        Ok(())
    }

    /// Uniform weights in `[min, max)` for every layer but the input layer.
    ///
    /// # Errors
    /// `InvalidConfiguration` if a bound is not finite; no weight changes then.
    pub fn randomize_weights(&mut self, max: f64, min: f64) -> Result<(), NeuroGraphError> {
        self.randomize_weights_with(&mut rand::thread_rng(), max, min)
    }

    pub fn randomize_weights_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        max: f64,
        min: f64,
    ) -> Result<(), NeuroGraphError> {
        let (low, high) = unit::uniform_bounds(max, min)?;
        for layer in &self.layers {
            layer.randomize_weights(&mut self.arena, rng, high, low)?;
        }
        debug!("randomized weights in [{}, {})", low, high);
        Ok(())
    }

    /// Gaussian weights `N(0, std_dev^2)` for every layer but the input layer.
    pub fn randomize_weights_normal<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        std_dev: f64,
    ) -> Result<(), NeuroGraphError> {
        unit::check_std_dev(std_dev)?;
        for layer in self.layers.iter().filter(|l| !l.is_input()) {
            for &id in layer.unit_ids() {
                self.arena.get_mut(id)?.randomize_weights_normal(rng, std_dev)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "network_test.rs"]
mod tests;
