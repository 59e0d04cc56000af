//! Training loop for neurograph networks: an epoch stepper with weight decay,
//! a progressive learning rate and a tournament of competing trainers.

pub mod alpha;
pub mod options;
pub mod report;
pub mod tournament;
pub mod trainer;

pub use alpha::AdaptiveAlpha;
pub use options::TrainerOptions;
pub use report::EpochReport;
pub use tournament::{Entrant, Tournament};
pub use trainer::Trainer;
