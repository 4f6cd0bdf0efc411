//! PyO3 wrapper for Simulator
//!
//! # Example (from Python)
//!
//! ```python
//! from cohort_simulator_core_rs import Simulator
//!
//! sim = Simulator({"policy": "core-first", "enrollment_rate": 100, "rng_seed": 7})
//! rosters = sim.run_replicates(3, 100, 15)
//! graduated = sum(s["graduated"] for s in rosters[0])
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::collections::BTreeSet;

use super::types::{options_to_py, parse_simulator_config, replicate_to_py};
use crate::orchestrator::{Simulator as RustSimulator, SimulatorConfig};

/// Python wrapper for the Rust Simulator
#[pyclass(name = "Simulator")]
pub struct PySimulator {
    inner: RustSimulator,
}

#[pymethods]
impl PySimulator {
    /// Create a simulator; raises ValueError on an invalid configuration
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let rust_config = match config {
            Some(dict) => parse_simulator_config(dict)?,
            None => SimulatorConfig::default(),
        };

        let inner = RustSimulator::new(rust_config)
            .map_err(|e| PyValueError::new_err(format!("Failed to create simulator: {}", e)))?;

        Ok(PySimulator { inner })
    }

    /// Run `count` replicates; returns one list of student dicts per replicate
    fn run_replicates<'py>(
        &mut self,
        py: Python<'py>,
        count: usize,
        enrollment_rate: usize,
        num_terms: usize,
    ) -> PyResult<Bound<'py, PyList>> {
        let records = self
            .inner
            .run_replicates(count, enrollment_rate, num_terms)
            .map_err(|e| PyRuntimeError::new_err(format!("Simulation failed: {}", e)))?;

        let rosters = records
            .iter()
            .map(|record| replicate_to_py(py, record))
            .collect::<PyResult<Vec<_>>>()?;
        Ok(PyList::new_bound(py, rosters))
    }

    /// Run with the configured parameters; returns the full run as JSON
    fn run_json(&mut self) -> PyResult<String> {
        let run = self
            .inner
            .run()
            .map_err(|e| PyRuntimeError::new_err(format!("Simulation failed: {}", e)))?;
        run.to_json(false)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Eligible courses for a history of completed courses
    fn eligible_courses<'py>(
        &self,
        py: Python<'py>,
        taken: Vec<String>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let taken: BTreeSet<String> = taken.into_iter().collect();
        options_to_py(py, &self.inner.resolver().eligible_courses(&taken))
    }

    /// Prerequisite/corequisite adjacency as JSON
    fn graph_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.resolver().adjacency())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Policy name in use
    fn policy(&self) -> &'static str {
        self.inner.resolver().policy().as_str()
    }
}
