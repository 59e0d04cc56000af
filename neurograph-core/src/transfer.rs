//! Differentiable transfer (activation) functions.
//!
//! Built-in kinds are enum variants; user-supplied `(fn, derivative)` pairs go
//! through [`Transfer::Custom`]. A [`TransferRegistry`] maps names to transfers
//! and is passed explicitly wherever a name has to be resolved.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::NeuroGraphError;

/// Scalar function applied to a unit's weighted input sum.
pub type ActivationFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Derivative of a transfer function, given `(input_sum, activation)`.
///
/// Both values are provided so that derivatives expressible in terms of the
/// activation (sigmoid, tanh) do not need to recompute it.
pub type DerivativeFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// A named, user-supplied transfer function and its derivative.
#[derive(Clone)]
pub struct CustomTransfer {
    name: String,
    function: ActivationFn,
    derivative: DerivativeFn,
}

impl fmt::Debug for CustomTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTransfer").field("name", &self.name).finish()
    }
}

/// A differentiable transfer function.
#[derive(Debug, Clone, Default)]
pub enum Transfer {
    /// `1 / (1 + e^-x)`, derivative `a(1 - a)`.
    #[default]
    LogisticSigmoid,
    /// Identity, derivative `1`.
    Linear,
    /// Smooth rectifier `ln(1 + e^x)`, derivative `1 / (1 + e^-x)`.
    Softplus,
    /// `tanh(x)`, derivative `1 - a^2`.
    Tanh,
    Custom(CustomTransfer),
}

impl Transfer {
    /// Wraps a user-supplied function and derivative.
    pub fn custom<F, D>(name: impl Into<String>, function: F, derivative: D) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Transfer::Custom(CustomTransfer {
            name: name.into(),
            function: Arc::new(function),
            derivative: Arc::new(derivative),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Transfer::LogisticSigmoid => "logistic-sigmoid",
            Transfer::Linear => "linear",
            Transfer::Softplus => "softplus",
            Transfer::Tanh => "tanh",
            Transfer::Custom(c) => &c.name,
        }
    }

    /// Maps a weighted input sum to an activation.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Transfer::LogisticSigmoid => logistic(x),
            Transfer::Linear => x,
            // max(x, 0) + ln(1 + e^-|x|) avoids overflowing e^x for large inputs
            Transfer::Softplus => x.max(0.0) + (-x.abs()).exp().ln_1p(),
            Transfer::Tanh => x.tanh(),
            Transfer::Custom(c) => (c.function)(x),
        }
    }

    /// Derivative at the given input sum / activation pair.
    pub fn derivative(&self, input_sum: f64, activation: f64) -> f64 {
        match self {
            Transfer::LogisticSigmoid => activation * (1.0 - activation),
            Transfer::Linear => 1.0,
            Transfer::Softplus => logistic(input_sum),
            Transfer::Tanh => 1.0 - activation * activation,
            Transfer::Custom(c) => (c.derivative)(input_sum, activation),
        }
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Name → transfer lookup table.
///
/// `TransferRegistry::default()` holds the built-ins: `logistic-sigmoid`,
/// `linear`, `softplus` (also registered as `rectifier`) and `tanh`.
#[derive(Debug, Clone)]
pub struct TransferRegistry {
    entries: HashMap<String, Transfer>,
}

impl Default for TransferRegistry {
    fn default() -> Self {
        let mut entries = HashMap::new();
        for transfer in [
            Transfer::LogisticSigmoid,
            Transfer::Linear,
            Transfer::Softplus,
            Transfer::Tanh,
        ] {
            entries.insert(transfer.name().to_string(), transfer);
        }
        entries.insert("rectifier".to_string(), Transfer::Softplus);
        TransferRegistry { entries }
    }
}

impl TransferRegistry {
    /// Registers (or replaces) a named `(fn, derivative)` pair.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the name is empty.
    pub fn register<F, D>(
        &mut self,
        name: &str,
        function: F,
        derivative: D,
    ) -> Result<&mut Self, NeuroGraphError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        if name.trim().is_empty() {
            return Err(NeuroGraphError::InvalidConfiguration(
                "transfer function name must not be empty".to_string(),
            ));
        }
        self.entries
            .insert(name.to_string(), Transfer::custom(name, function, derivative));
        Ok(self)
    }

    /// Looks up a transfer by name.
    pub fn get(&self, name: &str) -> Result<Transfer, NeuroGraphError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| NeuroGraphError::UnknownTransfer(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[cfg(test)]
#[path = "transfer_test.rs"]
mod tests;
