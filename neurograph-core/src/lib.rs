//! Feed-forward computation graph: units, layers and networks, plus the
//! matrix primitives and transfer functions they are built from.

pub mod arena;
pub mod config;
pub mod error;
pub mod layer;
pub mod matrix;
pub mod network;
pub mod transfer;
pub mod trial;
pub mod unit;

pub use arena::UnitArena;
pub use config::{LayerSpec, NetworkConfig};
pub use error::NeuroGraphError;
pub use layer::{Layer, PrebuiltLayer};
pub use matrix::Matrix;
pub use network::{Network, Observer, Weights};
pub use transfer::{Transfer, TransferRegistry};
pub use trial::Trial;
pub use unit::{Input, Unit, UnitId};
