//! Replicate records - simulation output
//!
//! Each replicate run yields a `ReplicateRecord`: every student ever
//! admitted (graduated or not, ordered by id) plus the per-term summary
//! series. A full run bundles the records with the configuration and its
//! fingerprint into a `SimulationRun`, the hand-off format for external
//! aggregation and reporting.
//!
//! # Critical Invariants
//!
//! - **Capacity**: no course ever ends a term above its capacity
//! - **Load**: at most two new courses per student per term
//! - **Graduation**: `graduated` iff the graduation rule holds

use crate::models::catalog::CourseCatalog;
use crate::models::student::{GraduationRule, Student, MAX_COURSES_PER_TERM};
use crate::orchestrator::engine::{SimulationError, SimulatorConfig, TermResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Output of one replicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateRecord {
    /// Replicate index within its simulator
    pub replicate: usize,

    /// Seed the replicate's RNG started from
    pub seed: u64,

    /// All admitted students, index == student id
    pub students: Vec<Student>,

    /// One summary per simulated term
    pub terms: Vec<TermResult>,
}

impl ReplicateRecord {
    pub fn student(&self, id: usize) -> Option<&Student> {
        self.students.get(id)
    }

    pub fn num_students(&self) -> usize {
        self.students.len()
    }

    pub fn graduated_count(&self) -> usize {
        self.students.iter().filter(|s| s.is_graduated()).count()
    }

    /// Per-course enrollment at the close of each term
    pub fn enrollment_series(&self) -> Vec<&BTreeMap<String, usize>> {
        self.terms.iter().map(|t| &t.enrollments).collect()
    }
}

/// A complete multi-replicate run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    /// Run identifier (metadata only, not derived from the seed)
    pub run_id: Uuid,

    /// SHA-256 of the canonical config JSON
    pub config_hash: String,

    pub config: SimulatorConfig,

    pub replicates: Vec<ReplicateRecord>,
}

impl SimulationRun {
    pub fn new(
        config: SimulatorConfig,
        replicates: Vec<ReplicateRecord>,
    ) -> Result<Self, SimulationError> {
        let config_hash = compute_config_hash(&config)?;
        Ok(Self {
            run_id: Uuid::new_v4(),
            config_hash,
            config,
            replicates,
        })
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, SimulationError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| SimulationError::SerializationError(format!("Run serialization failed: {}", e)))
    }
}

/// Deterministic SHA-256 fingerprint of a config
///
/// Object keys are sorted recursively before hashing so the digest does not
/// depend on field or map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;
    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Check a replicate record against the registration invariants
///
/// `catalog` supplies course capacities; `rule` the graduation rule the
/// replicate ran under.
pub fn validate_replicate(
    record: &ReplicateRecord,
    catalog: &CourseCatalog,
    rule: &GraduationRule,
) -> Result<(), SimulationError> {
    // 1. Capacity never exceeded at term close
    for term in &record.terms {
        for (code, &enrolled) in &term.enrollments {
            let capacity = catalog.get(code).map(|c| c.capacity()).ok_or_else(|| {
                SimulationError::StateValidationError(format!(
                    "Term {} reports unknown course {}",
                    term.term, code
                ))
            })?;
            if enrolled > capacity {
                return Err(SimulationError::StateValidationError(format!(
                    "Course {} over capacity in term {}: {} > {}",
                    code, term.term, enrolled, capacity
                )));
            }
        }
    }

    let num_terms = record.terms.len();
    for (index, student) in record.students.iter().enumerate() {
        // 2. Sequential ids
        if student.id() != index {
            return Err(SimulationError::StateValidationError(format!(
                "Student at position {} has id {}",
                index,
                student.id()
            )));
        }

        // 3. Course load and attendance bounds
        if student.courses_taken().len() > MAX_COURSES_PER_TERM * student.terms_attended() {
            return Err(SimulationError::StateValidationError(format!(
                "Student {} holds {} courses after {} terms",
                student.id(),
                student.courses_taken().len(),
                student.terms_attended()
            )));
        }
        if student.admitted_term() + student.terms_attended() > num_terms
            || student.leaves_of_absence() > student.terms_attended()
        {
            return Err(SimulationError::StateValidationError(format!(
                "Student {} attendance inconsistent: admitted term {}, {} terms attended, {} leaves",
                student.id(),
                student.admitted_term(),
                student.terms_attended(),
                student.leaves_of_absence()
            )));
        }

        // 4. Graduation flag matches the rule
        if student.is_graduated() != rule.is_satisfied(student.courses_taken()) {
            return Err(SimulationError::StateValidationError(format!(
                "Student {} graduated={} disagrees with graduation rule",
                student.id(),
                student.is_graduated()
            )));
        }
    }

    Ok(())
}
