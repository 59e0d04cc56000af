use crate::error::NeuroGraphError;
use crate::layer::PrebuiltLayer;
use crate::transfer::{Transfer, TransferRegistry};

/// One entry of a network's layer list.
#[derive(Debug, Clone)]
pub enum LayerSpec {
    /// A fresh layer of this many units using the network-wide transfer.
    Width(usize),
    Prebuilt(PrebuiltLayer),
}

impl From<usize> for LayerSpec {
    fn from(width: usize) -> Self {
        LayerSpec::Width(width)
    }
}

impl From<PrebuiltLayer> for LayerSpec {
    fn from(layer: PrebuiltLayer) -> Self {
        LayerSpec::Prebuilt(layer)
    }
}

/// Construction parameters for a [`Network`](crate::network::Network).
///
/// `alpha` and `lambda` are not used by the network itself; trainers built
/// from the network take them as defaults.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub layers: Vec<LayerSpec>,
    pub transfer: Transfer,
    /// Overrides `transfer` for a width-specified output layer.
    pub output_transfer: Option<Transfer>,
    pub alpha: f64,
    pub lambda: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            layers: Vec::new(),
            transfer: Transfer::default(),
            output_transfer: None,
            alpha: 0.1,
            lambda: 0.0,
        }
    }
}

impl NetworkConfig {
    pub fn new(layers: Vec<LayerSpec>) -> Self {
        NetworkConfig {
            layers,
            ..Default::default()
        }
    }

    /// Shorthand for a stack of width-specified layers.
    pub fn with_widths(widths: &[usize]) -> Self {
        NetworkConfig::new(widths.iter().map(|&w| LayerSpec::Width(w)).collect())
    }

    pub fn transfer(mut self, transfer: Transfer) -> Self {
        self.transfer = transfer;
        self
    }

    /// Looks the hidden transfer up by name.
    pub fn transfer_named(mut self, registry: &TransferRegistry, name: &str) -> Result<Self, NeuroGraphError> {
        self.transfer = registry.get(name)?;
        Ok(self)
    }

    pub fn output_transfer(mut self, transfer: Transfer) -> Self {
        self.output_transfer = Some(transfer);
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Checks everything that can be checked before any unit is built.
    pub fn validate(&self) -> Result<(), NeuroGraphError> {
        if self.layers.is_empty() {
            return Err(NeuroGraphError::InvalidConfiguration(
                "a network needs at least one layer".to_string(),
            ));
        }
        for (index, spec) in self.layers.iter().enumerate() {
            let width = match spec {
                LayerSpec::Width(w) => *w,
                LayerSpec::Prebuilt(layer) => layer.width(),
            };
            if width == 0 {
                return Err(NeuroGraphError::InvalidLayerSpec(format!(
                    "layer {} has no units",
                    index
                )));
            }
        }
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
        Ok(())
    }
}
