use neurograph_core::{Network, NeuroGraphError};

use crate::alpha::AdaptiveAlpha;

/// Hyperparameters for a [`Trainer`](crate::Trainer).
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerOptions {
    /// Initial learning rate.
    pub alpha: f64,
    /// Weight decay strength.
    pub lambda: f64,
    pub adaptive: Option<AdaptiveAlpha>,
    /// Keep every example's outputs in the epoch report.
    pub record_outputs: bool,
    /// Log each epoch at `info` rather than `debug`.
    pub verbose: bool,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        TrainerOptions {
            alpha: 0.1,
            lambda: 0.0,
            adaptive: None,
            record_outputs: false,
            verbose: false,
        }
    }
}

impl TrainerOptions {
    /// Takes alpha and lambda from the network's construction config.
    pub fn from_network(network: &Network) -> Self {
        TrainerOptions {
            alpha: network.alpha(),
            lambda: network.lambda(),
            ..Default::default()
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn adaptive(mut self, policy: AdaptiveAlpha) -> Self {
        self.adaptive = Some(policy);
        self
    }

    pub fn record_outputs(mut self, record: bool) -> Self {
        self.record_outputs = record;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn validate(&self) -> Result<(), NeuroGraphError> {
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return Err(NeuroGraphError::InvalidConfiguration(format!(
                "alpha must be positive and finite, got {}",
                self.alpha
            )));
        }
        if !(self.lambda >= 0.0 && self.lambda.is_finite()) {
            return Err(NeuroGraphError::InvalidConfiguration(format!(
                "lambda must be non-negative and finite, got {}",
                self.lambda
            )));
        }
        if let Some(policy) = &self.adaptive {
            policy.validate()?;
        }
        Ok(())
    }
}
