//! Registration Policy Module
//!
//! A policy decides which courses a student may attempt in the current term,
//! given the courses already completed.
//!
//! # Overview
//!
//! Each named policy wraps one `CourseGraph`. The `EligibilityResolver`
//! walks that graph in source order and returns a `CourseOptions` mapping:
//! every key is directly selectable this term, and its value lists the
//! courses that become takeable in the same term if the key is chosen.
//!
//! Available policies:
//! 1. **no-restrictions**: the graph follows the program's real
//!    prerequisite chains
//! 2. **core-first**: every elective requires the full core set
//!
//! # Corequisite unlocks
//!
//! A course whose prerequisites are not all met can still become reachable
//! when the outstanding prerequisites are exactly its outstanding
//! corequisites. If each of those corequisites has its own prerequisites
//! met, the course is recorded as a companion under every outstanding
//! corequisite key:
//!
//! ```rust
//! use cohort_simulator_core_rs::policy::EligibilityResolver;
//! use std::collections::BTreeSet;
//!
//! let resolver = EligibilityResolver::new("no-restrictions").unwrap();
//! let options = resolver.eligible_courses(&BTreeSet::new());
//!
//! // 593 needs 591, but may be taken together with it
//! assert_eq!(options.companions("591"), Some(&["593".to_string()][..]));
//! assert!(!options.contains("593"));
//! ```

pub mod graph;
pub mod options;

pub use graph::{
    CorequisiteAnnotation, CourseGraph, CourseGraphEntry, GraphAdjacency, PrerequisiteEdge,
    DEFAULT_CORE_COURSES, DEFAULT_ELECTIVE_COURSES,
};
pub use options::CourseOptions;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a policy or its graph
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("policy name \"{name}\" does not match available policy names {available:?}")]
    UnknownPolicy { name: String, available: Vec<String> },

    #[error("Course {0} appears more than once in the course graph")]
    DuplicateCourse(String),

    #[error("Course {course} references unknown course {reference}")]
    UnknownCourseReference { course: String, reference: String },

    #[error("Invalid course graph JSON: {0}")]
    Json(String),
}

/// Recognized policy names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyName {
    NoRestrictions,
    CoreFirst,
}

impl PolicyName {
    pub const ALL: [PolicyName; 2] = [PolicyName::NoRestrictions, PolicyName::CoreFirst];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyName::NoRestrictions => "no-restrictions",
            PolicyName::CoreFirst => "core-first",
        }
    }

    /// Built-in graph for this policy
    pub fn default_graph(&self) -> CourseGraph {
        match self {
            PolicyName::NoRestrictions => CourseGraph::no_restrictions(),
            PolicyName::CoreFirst => CourseGraph::core_first(),
        }
    }
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyName {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyName::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PolicyError::UnknownPolicy {
                name: s.to_string(),
                available: PolicyName::ALL.iter().map(|p| p.as_str().to_string()).collect(),
            })
    }
}

/// Computes the courses a student may register for this term
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct EligibilityResolver {
    policy: PolicyName,
    graph: CourseGraph,
}

impl EligibilityResolver {
    /// Resolver for a named policy with its built-in graph
    ///
    /// # Errors
    /// `PolicyError::UnknownPolicy` unless `policy_name` is
    /// `"no-restrictions"` or `"core-first"`.
    pub fn new(policy_name: &str) -> Result<Self, PolicyError> {
        let policy: PolicyName = policy_name.parse()?;
        Ok(Self::for_policy(policy))
    }

    pub fn for_policy(policy: PolicyName) -> Self {
        Self {
            policy,
            graph: policy.default_graph(),
        }
    }

    /// Resolver for a named policy over a custom graph
    pub fn with_graph(policy: PolicyName, graph: CourseGraph) -> Self {
        Self { policy, graph }
    }

    pub fn policy(&self) -> PolicyName {
        self.policy
    }

    pub fn graph(&self) -> &CourseGraph {
        &self.graph
    }

    /// Eligible courses given the set already completed
    ///
    /// Walks the graph in source order. For each course not yet taken:
    /// - prerequisites met (or none) → directly selectable
    /// - otherwise, with corequisites: if the outstanding prerequisites
    ///   equal the outstanding corequisites and every outstanding
    ///   corequisite has its own prerequisites met, the course is added as a
    ///   companion under each outstanding corequisite
    /// - otherwise ineligible this term
    pub fn eligible_courses(&self, taken: &BTreeSet<String>) -> CourseOptions {
        let mut options = CourseOptions::new();

        for entry in self.graph.entries() {
            if taken.contains(entry.code.as_str()) {
                continue;
            }

            if entry.prerequisites_met(taken) {
                options.insert_if_absent(&entry.code);
                continue;
            }

            if !entry.has_corequisites() {
                continue;
            }

            let remaining_pre = outstanding(&entry.prerequisites, taken);
            let remaining_co = outstanding(&entry.corequisites, taken);
            if remaining_pre != remaining_co {
                continue;
            }

            if remaining_co.is_empty() {
                options.insert_if_absent(&entry.code);
                continue;
            }

            if self.corequisites_ready(taken, &remaining_co) {
                for co in &remaining_co {
                    options.add_companion(co, &entry.code);
                }
            }
        }

        options
    }

    /// Every outstanding corequisite has its own prerequisites met
    ///
    /// Checked one level deep only.
    fn corequisites_ready(&self, taken: &BTreeSet<String>, remaining: &BTreeSet<&str>) -> bool {
        remaining.iter().all(|co| {
            self.graph
                .get(co)
                .is_some_and(|entry| entry.prerequisites_met(taken))
        })
    }

    /// Prerequisite edges and corequisite annotations of the graph
    pub fn adjacency(&self) -> GraphAdjacency {
        self.graph.adjacency()
    }
}

fn outstanding<'a>(codes: &'a [String], taken: &BTreeSet<String>) -> BTreeSet<&'a str> {
    codes
        .iter()
        .map(String::as_str)
        .filter(|code| !taken.contains(*code))
        .collect()
}
