pub mod traits;
pub mod training_data;

pub use traits::Dataset;
pub use training_data::{TrainingData, Trials};
