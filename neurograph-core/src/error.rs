use thiserror::Error;

/// Custom error type for the neurograph framework.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum NeuroGraphError {
    #[error("Shape mismatch: expected {expected}, got {actual} during operation {operation}")]
    ShapeMismatch {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual} during operation {operation}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Cannot multiply {shape1:?} with {shape2:?} matrices")]
    IncompatibleShapes { shape1: [usize; 2], shape2: [usize; 2] },

    #[error("Invalid layer specification: {0}")]
    InvalidLayerSpec(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unknown transfer function: {0}")]
    UnknownTransfer(String),

    #[error("Numeric overflow: {operation} produced NaN (unit {unit:?})")]
    NumericOverflow {
        operation: String,
        unit: Option<usize>,
    },

    #[error("Unit {unit:?} has no {what}")]
    MissingValue {
        what: &'static str,
        unit: Option<usize>,
    },

    #[error("Cycle detected in the unit graph at unit {0}")]
    CycleDetected(usize),

    #[error("Unit {0} does not exist in this network")]
    UnitNotFound(usize),

    #[error("Index out of bounds: index {index} for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot train against an empty dataset")]
    EmptyDataset,
}
