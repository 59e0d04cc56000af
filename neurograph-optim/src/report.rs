use neurograph_core::Weights;

/// What a trainer reports after each epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    /// 1 for the first epoch.
    pub epoch: usize,
    /// Root mean square of the per-example half squared errors.
    pub error: f64,
    pub min_error: f64,
    /// Weights that produced `min_error`.
    pub best_weights: Weights,
    /// Learning rate for the next epoch.
    pub alpha: f64,
    /// Network outputs for every example in order, when recording is enabled.
    pub outputs: Option<Vec<Vec<f64>>>,
}
