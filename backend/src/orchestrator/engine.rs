//! Simulator Engine
//!
//! Main simulation loop tying the eligibility resolver, students and
//! capacity-limited courses together.
//!
//! # Architecture
//!
//! ```text
//! For each replicate r:
//!   seed RNG from (base seed, r); reset every course; clear event log
//!   For each term t:
//!     1. Admit a cohort of fresh students (sequential ids)
//!     2. Shuffle the active roster (no registration-time priority)
//!     3. Each student, one at a time, registers against live capacity
//!     4. Graduates leave the active roster
//!     5. Snapshot per-course enrollment, then reset all seat counters
//! ```
//!
//! Registration is strictly sequential within a replicate: the capacity check
//! and the enrollment that follows it can never interleave with another
//! student's.
//!
//! # Example
//!
//! ```rust
//! use cohort_simulator_core_rs::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig {
//!     enrollment_rate: 20,
//!     num_terms: 4,
//!     num_replicates: 2,
//!     ..SimulatorConfig::default()
//! };
//!
//! let mut simulator = Simulator::new(config).unwrap();
//! let run = simulator.run().unwrap();
//!
//! assert_eq!(run.replicates.len(), 2);
//! assert_eq!(run.replicates[0].students.len(), 80);
//! ```

use crate::core::term::TermClock;
use crate::models::catalog::CourseCatalog;
use crate::models::course::CourseError;
use crate::models::event::{Event, EventLog};
use crate::models::student::{
    GraduationRule, RegistrationError, Student, DEFAULT_MIN_COURSES_TO_GRADUATE,
    DEFAULT_SINGLE_COURSE_PROBABILITY,
};
use crate::orchestrator::record::{validate_replicate, ReplicateRecord, SimulationRun};
use crate::policy::{
    CourseGraph, EligibilityResolver, PolicyError, PolicyName, DEFAULT_CORE_COURSES,
    DEFAULT_ELECTIVE_COURSES,
};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulator configuration
///
/// Every field has a default, so a JSON config only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Policy name: "no-restrictions" or "core-first"
    pub policy: String,

    /// Seats per term in each core course
    pub core_capacity: usize,

    /// Seats per term in each elective
    pub elective_capacity: usize,

    /// Students admitted at the start of every term
    pub enrollment_rate: usize,

    /// Terms per replicate
    pub num_terms: usize,

    /// Replicates per run
    pub num_replicates: usize,

    /// Chance a student stops after each successful registration
    pub single_course_probability: f64,

    /// Base seed; replicate seeds are derived from it
    pub rng_seed: u64,

    pub core_courses: Vec<String>,

    pub elective_courses: Vec<String>,

    /// Distinct courses required to graduate (core set always required)
    pub min_courses_to_graduate: usize,

    /// Replaces the built-in graph of `policy` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_graph: Option<CourseGraph>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            policy: PolicyName::NoRestrictions.as_str().to_string(),
            core_capacity: 350,
            elective_capacity: 50,
            enrollment_rate: 230,
            num_terms: 15,
            num_replicates: 3,
            single_course_probability: DEFAULT_SINGLE_COURSE_PROBABILITY,
            rng_seed: 42,
            core_courses: DEFAULT_CORE_COURSES.iter().map(|s| s.to_string()).collect(),
            elective_courses: DEFAULT_ELECTIVE_COURSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_courses_to_graduate: DEFAULT_MIN_COURSES_TO_GRADUATE,
            course_graph: None,
        }
    }
}

impl SimulatorConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json)
            .map_err(|e| SimulationError::InvalidConfig(format!("Config parse failed: {}", e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

// ============================================================================
// Results and Errors
// ============================================================================

/// Summary of one simulated term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermResult {
    pub term: usize,

    /// Students admitted at the start of the term
    pub num_admitted: usize,

    /// Active students that went through registration
    pub num_registering: usize,

    /// Seats taken across all courses
    pub num_enrollments: usize,

    /// Draws that hit a full course
    pub num_failed_attempts: usize,

    /// Students who registered for nothing
    pub num_leaves: usize,

    pub num_graduated: usize,

    /// Active roster size after graduates left
    pub active_after: usize,

    /// Seats taken per course at term close
    pub enrollments: BTreeMap<String, usize>,
}

/// Simulation error types
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CourseError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("State validation error: {0}")]
    StateValidationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Simulator
// ============================================================================

/// Owns the course catalog and policy, and runs replicates
///
/// # Determinism
///
/// Replicate `k` always uses `RngManager::derive_seed(rng_seed, k)`.
/// Same config + same replicate index = identical roster.
pub struct Simulator {
    config: SimulatorConfig,

    resolver: EligibilityResolver,

    /// Seat counters, reset between terms and at replicate start
    catalog: CourseCatalog,

    graduation_rule: GraduationRule,

    /// History of the most recent replicate
    event_log: EventLog,

    /// Replicates started so far via `run_one`
    replicates_run: usize,
}

impl Simulator {
    /// Create a simulator from configuration
    ///
    /// # Errors
    ///
    /// * `SimulationError::Policy` - unrecognized policy name
    /// * `SimulationError::Catalog` - a course code listed twice
    /// * `SimulationError::InvalidConfig` - any other rejected parameter
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        Self::build(config).map_err(|e| {
            warn!(error = %e, "rejected simulator configuration");
            e
        })
    }

    fn build(config: SimulatorConfig) -> Result<Self, SimulationError> {
        let policy: PolicyName = config.policy.parse()?;
        Self::validate_config(&config)?;

        let catalog = CourseCatalog::from_lists(
            &config.core_courses,
            config.core_capacity,
            &config.elective_courses,
            config.elective_capacity,
        )?;

        let graph = config
            .course_graph
            .clone()
            .unwrap_or_else(|| policy.default_graph());
        let known: HashSet<&str> = catalog.codes().into_iter().collect();
        let missing = graph.missing_from(&known);
        if !missing.is_empty() {
            return Err(SimulationError::InvalidConfig(format!(
                "course graph lists courses missing from the catalog: {}",
                missing.join(", ")
            )));
        }

        let graduation_rule = GraduationRule::new(
            config.core_courses.iter().cloned(),
            config.min_courses_to_graduate,
        );

        Ok(Self {
            resolver: EligibilityResolver::with_graph(policy, graph),
            catalog,
            graduation_rule,
            event_log: EventLog::new(),
            replicates_run: 0,
            config,
        })
    }

    fn validate_config(config: &SimulatorConfig) -> Result<(), SimulationError> {
        if config.core_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "core_capacity must be > 0".to_string(),
            ));
        }

        if config.elective_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "elective_capacity must be > 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&config.single_course_probability) {
            return Err(SimulationError::InvalidConfig(format!(
                "single_course_probability must be within [0, 1], got {}",
                config.single_course_probability
            )));
        }

        if config.core_courses.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "core_courses must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn resolver(&self) -> &EligibilityResolver {
        &self.resolver
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    pub fn graduation_rule(&self) -> &GraduationRule {
        &self.graduation_rule
    }

    /// Events of the most recent replicate
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn replicates_run(&self) -> usize {
        self.replicates_run
    }

    /// Seed used by replicate `replicate`
    pub fn replicate_seed(&self, replicate: usize) -> u64 {
        RngManager::derive_seed(self.config.rng_seed, replicate as u64)
    }

    /// Check a record produced by this simulator against its invariants
    pub fn validate(&self, record: &ReplicateRecord) -> Result<(), SimulationError> {
        validate_replicate(record, &self.catalog, &self.graduation_rule)
    }

    // ========================================================================
    // Runs
    // ========================================================================

    /// Run the configured number of replicates with the configured rates
    pub fn run(&mut self) -> Result<SimulationRun, SimulationError> {
        let replicates = self.run_replicates(
            self.config.num_replicates,
            self.config.enrollment_rate,
            self.config.num_terms,
        )?;
        SimulationRun::new(self.config.clone(), replicates)
    }

    /// Run `count` independent replicates
    pub fn run_replicates(
        &mut self,
        count: usize,
        enrollment_rate: usize,
        num_terms: usize,
    ) -> Result<Vec<ReplicateRecord>, SimulationError> {
        (0..count)
            .map(|_| self.run_one(enrollment_rate, num_terms))
            .collect()
    }

    /// Run the next replicate
    pub fn run_one(
        &mut self,
        enrollment_rate: usize,
        num_terms: usize,
    ) -> Result<ReplicateRecord, SimulationError> {
        let replicate = self.replicates_run;
        self.replicates_run += 1;
        let seed = self.replicate_seed(replicate);
        self.run_replicate_with_seed(replicate, seed, enrollment_rate, num_terms)
    }

    /// Run one replicate from an explicit seed
    ///
    /// Starts from fully reset course state and a fresh event log.
    pub fn run_replicate_with_seed(
        &mut self,
        replicate: usize,
        seed: u64,
        enrollment_rate: usize,
        num_terms: usize,
    ) -> Result<ReplicateRecord, SimulationError> {
        let mut rng = RngManager::new(seed);
        self.catalog.reset_all();
        self.event_log.clear();

        let mut clock = TermClock::new(num_terms);
        let mut students: Vec<Student> = Vec::with_capacity(enrollment_rate * num_terms);
        let mut active: Vec<usize> = Vec::new();
        let mut terms = Vec::with_capacity(num_terms);

        while !clock.is_finished() {
            let result = self.run_term(
                clock.current_term(),
                enrollment_rate,
                &mut students,
                &mut active,
                &mut rng,
            )?;
            terms.push(result);
            clock.advance_term();
        }

        let record = ReplicateRecord {
            replicate,
            seed,
            students,
            terms,
        };
        info!(
            replicate,
            seed,
            students = record.num_students(),
            graduated = record.graduated_count(),
            "replicate finished"
        );
        Ok(record)
    }

    /// One term: admit, shuffle, register everyone, reset seats
    fn run_term(
        &mut self,
        term: usize,
        enrollment_rate: usize,
        students: &mut Vec<Student>,
        active: &mut Vec<usize>,
        rng: &mut RngManager,
    ) -> Result<TermResult, SimulationError> {
        // STEP 1: ADMISSIONS
        let first_id = students.len();
        for id in first_id..first_id + enrollment_rate {
            students.push(Student::with_single_course_probability(
                id,
                term,
                self.config.single_course_probability,
            ));
            active.push(id);
            self.event_log.log(Event::Admitted {
                term,
                student_id: id,
            });
        }

        // STEP 2: RANDOM REGISTRATION ORDER
        rng.shuffle(active);

        let mut result = TermResult {
            term,
            num_admitted: enrollment_rate,
            num_registering: active.len(),
            ..TermResult::default()
        };

        // STEP 3: SEQUENTIAL REGISTRATION
        let order = active.clone();
        for id in order {
            let student = &mut students[id];
            let outcome = student.register_for_term(
                term,
                &self.resolver,
                &mut self.catalog,
                &self.graduation_rule,
                rng,
            )?;

            for course in &outcome.full_courses {
                self.event_log.log(Event::CourseFull {
                    term,
                    student_id: id,
                    course: course.clone(),
                });
            }
            for course in &outcome.selected {
                self.event_log.log(Event::Enrolled {
                    term,
                    student_id: id,
                    course: course.clone(),
                });
            }
            if outcome.is_leave_of_absence() {
                result.num_leaves += 1;
                self.event_log.log(Event::LeaveOfAbsence {
                    term,
                    student_id: id,
                });
            }

            result.num_enrollments += outcome.selected.len();
            result.num_failed_attempts += outcome.full_courses.len();

            // STEP 4: GRADUATES LEAVE THE ROSTER
            if outcome.graduated {
                result.num_graduated += 1;
                self.event_log.log(Event::Graduated {
                    term,
                    student_id: id,
                    terms_attended: student.terms_attended(),
                });
            }
        }
        active.retain(|&id| !students[id].is_graduated());
        result.active_after = active.len();

        // STEP 5: CLOSE TERM
        result.enrollments = self.catalog.enrollment_snapshot();
        self.event_log.log(Event::TermClosed {
            term,
            active_students: result.num_registering,
            enrollments: result.enrollments.clone(),
        });
        self.catalog.reset_all();

        debug!(
            term,
            admitted = result.num_admitted,
            registering = result.num_registering,
            enrollments = result.num_enrollments,
            failed_attempts = result.num_failed_attempts,
            leaves = result.num_leaves,
            graduated = result.num_graduated,
            "term closed"
        );

        Ok(result)
    }
}
