//! ferrobind-common — Shared types, errors, and configuration used across all Ferrobind crates.

pub mod error;
pub mod objective;
pub mod config;

// Re-export commonly used types
pub use error::{FerrobindError, Result};
pub use objective::{Direction, SweepPolicy};
pub use config::{SelectionConfig, InputConfig, ObjectiveConfig, OutputConfig, HypervolumeConfig};
