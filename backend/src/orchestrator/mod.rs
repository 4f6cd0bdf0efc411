//! Orchestrator - replicate and term loop
//!
//! See `engine.rs` for the simulation loop and `record.rs` for the output
//! records handed to external aggregation.

pub mod engine;
pub mod record;

// Re-export main types for convenience
pub use engine::{SimulationError, Simulator, SimulatorConfig, TermResult};
pub use record::{compute_config_hash, validate_replicate, ReplicateRecord, SimulationRun};
