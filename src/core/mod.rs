pub mod config;
pub mod error;
pub mod types;

pub use config::{LlmConfig, SimulationConfig};
pub use error::{Result, SchellingError};
pub use types::{Cell, CellPos};
