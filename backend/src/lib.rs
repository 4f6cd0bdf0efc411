//! Cohort Registration Simulator Core - Rust Engine
//!
//! Models a cohort of graduate students moving through a program under
//! course-capacity limits and prerequisite/corequisite rules, to estimate
//! time-to-graduation, bottleneck courses and registration-failure rates
//! under different admission policies.
//!
//! # Architecture
//!
//! - **core**: Term clock
//! - **models**: Domain types (Course, CourseCatalog, Student, Event)
//! - **policy**: Course graphs and the eligibility resolver
//! - **orchestrator**: Replicate/term loop and output records
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. No course ever holds more students than its capacity
//! 2. All randomness is deterministic (seeded RNG, one per replicate)
//! 3. Registration within a replicate is strictly sequential

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;

// Re-exports for convenience
pub use crate::core::term::TermClock;
pub use models::{
    catalog::{CourseCatalog, CourseCategory},
    course::{Course, CourseError},
    event::{Event, EventLog},
    student::{GraduationRule, RegistrationError, Student, TermRegistration},
};
pub use orchestrator::{
    ReplicateRecord, SimulationError, SimulationRun, Simulator, SimulatorConfig, TermResult,
};
pub use policy::{CourseGraph, CourseOptions, EligibilityResolver, PolicyError, PolicyName};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn cohort_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulator::PySimulator>()?;
    Ok(())
}
