//! Type conversion utilities for the FFI boundary

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::models::student::Student;
use crate::orchestrator::{ReplicateRecord, SimulatorConfig};
use crate::policy::CourseOptions;

/// Extract a field with a default value if missing.
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

/// Build a `SimulatorConfig` from a Python dict; absent keys keep defaults
pub fn parse_simulator_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulatorConfig> {
    let defaults = SimulatorConfig::default();

    Ok(SimulatorConfig {
        policy: extract_with_default(py_config, "policy", defaults.policy)?,
        core_capacity: extract_with_default(py_config, "core_capacity", defaults.core_capacity)?,
        elective_capacity: extract_with_default(
            py_config,
            "elective_capacity",
            defaults.elective_capacity,
        )?,
        enrollment_rate: extract_with_default(
            py_config,
            "enrollment_rate",
            defaults.enrollment_rate,
        )?,
        num_terms: extract_with_default(py_config, "num_terms", defaults.num_terms)?,
        num_replicates: extract_with_default(py_config, "num_replicates", defaults.num_replicates)?,
        single_course_probability: extract_with_default(
            py_config,
            "single_course_probability",
            defaults.single_course_probability,
        )?,
        rng_seed: extract_with_default(py_config, "rng_seed", defaults.rng_seed)?,
        core_courses: extract_with_default(py_config, "core_courses", defaults.core_courses)?,
        elective_courses: extract_with_default(
            py_config,
            "elective_courses",
            defaults.elective_courses,
        )?,
        min_courses_to_graduate: extract_with_default(
            py_config,
            "min_courses_to_graduate",
            defaults.min_courses_to_graduate,
        )?,
        course_graph: None,
    })
}

/// Convert one student into a Python dict
pub fn student_to_py<'py>(py: Python<'py>, student: &Student) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("id", student.id())?;
    dict.set_item("admitted_term", student.admitted_term())?;
    dict.set_item("terms_attended", student.terms_attended())?;
    dict.set_item(
        "courses_taken",
        student.courses_taken().iter().cloned().collect::<Vec<String>>(),
    )?;
    dict.set_item("failed_attempts", student.failed_attempts().clone())?;
    dict.set_item("leaves_of_absence", student.leaves_of_absence())?;
    dict.set_item("graduated", student.is_graduated())?;
    dict.set_item("graduation_term", student.graduation_term())?;
    Ok(dict)
}

/// Convert a replicate's roster into a Python list of student dicts
pub fn replicate_to_py<'py>(
    py: Python<'py>,
    record: &ReplicateRecord,
) -> PyResult<Bound<'py, PyList>> {
    let students = record
        .students
        .iter()
        .map(|s| student_to_py(py, s))
        .collect::<PyResult<Vec<_>>>()?;
    Ok(PyList::new_bound(py, students))
}

/// Convert eligible options into a dict: course → companion list
pub fn options_to_py<'py>(py: Python<'py>, options: &CourseOptions) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    for (code, companions) in options.iter() {
        dict.set_item(code, companions.to_vec())?;
    }
    Ok(dict)
}
