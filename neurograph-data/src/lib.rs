//! Training sets for neurograph networks.

pub mod datasets;
pub mod samplers;

pub use datasets::{Dataset, TrainingData, Trials};
pub use neurograph_core::Trial;
pub use samplers::{Sampler, SequentialSampler};
