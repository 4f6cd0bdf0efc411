//! Course dependency graph
//!
//! A `CourseGraph` lists every course a policy knows about, in a fixed
//! source order, with its prerequisite and corequisite codes. The graph is
//! configuration data: the two built-in graphs mirror the program's real
//! prerequisite chains, and custom graphs can be loaded from JSON.
//!
//! JSON form is a list of entries:
//!
//! ```json
//! [
//!   { "code": "591" },
//!   { "code": "593", "prerequisites": ["591"], "corequisites": ["591"] }
//! ]
//! ```

use crate::policy::PolicyError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Core course codes of the default program
pub const DEFAULT_CORE_COURSES: [&str; 6] = ["591", "592", "593", "594", "595", "596"];

/// Elective course codes of the default program
pub const DEFAULT_ELECTIVE_COURSES: [&str; 6] = ["515", "547", "549", "550", "581", "542"];

/// Requirements of one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGraphEntry {
    pub code: String,

    /// Courses that must be completed in an earlier term
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,

    /// Courses that may instead be taken in the same term
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub corequisites: Vec<String>,
}

impl CourseGraphEntry {
    pub fn new(code: &str, prerequisites: &[&str], corequisites: &[&str]) -> Self {
        Self {
            code: code.to_string(),
            prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
            corequisites: corequisites.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// True if every prerequisite is in `taken` (vacuously true with none)
    pub fn prerequisites_met(&self, taken: &BTreeSet<String>) -> bool {
        self.prerequisites
            .iter()
            .all(|pre| taken.contains(pre.as_str()))
    }

    pub fn has_corequisites(&self) -> bool {
        !self.corequisites.is_empty()
    }
}

/// Directed edge `prerequisite → course`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    pub prerequisite: String,
    pub course: String,
}

/// Corequisite set attached to a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorequisiteAnnotation {
    pub course: String,
    pub corequisites: Vec<String>,
}

/// Renderer-neutral view of a course graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphAdjacency {
    /// Node list in source order
    pub courses: Vec<String>,
    pub prerequisite_edges: Vec<PrerequisiteEdge>,
    pub corequisites: Vec<CorequisiteAnnotation>,
}

/// Ordered course dependency graph
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::policy::{CourseGraph, CourseGraphEntry};
///
/// let graph = CourseGraph::new(vec![
///     CourseGraphEntry::new("591", &[], &[]),
///     CourseGraphEntry::new("593", &["591"], &["591"]),
/// ])
/// .unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.get("593").unwrap().prerequisites, vec!["591".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CourseGraphEntry>", into = "Vec<CourseGraphEntry>")]
pub struct CourseGraph {
    entries: Vec<CourseGraphEntry>,
    index: HashMap<String, usize>,
}

impl CourseGraph {
    /// Build a graph, validating it
    ///
    /// # Errors
    /// - `PolicyError::DuplicateCourse` if a code has two entries
    /// - `PolicyError::UnknownCourseReference` if a prerequisite or
    ///   corequisite names a course with no entry
    pub fn new(entries: Vec<CourseGraphEntry>) -> Result<Self, PolicyError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.code.clone(), i).is_some() {
                return Err(PolicyError::DuplicateCourse(entry.code.clone()));
            }
        }

        for entry in &entries {
            for reference in entry.prerequisites.iter().chain(&entry.corequisites) {
                if !index.contains_key(reference) {
                    return Err(PolicyError::UnknownCourseReference {
                        course: entry.code.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }

        Ok(Self { entries, index })
    }

    /// Parse and validate a graph from JSON
    ///
    /// # Errors
    /// `PolicyError::Json` on malformed input, otherwise as `new`.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let entries: Vec<CourseGraphEntry> =
            serde_json::from_str(json).map_err(|e| PolicyError::Json(e.to_string()))?;
        Self::new(entries)
    }

    /// Graph reflecting the program's real prerequisite chains
    pub fn no_restrictions() -> Self {
        let mut entries = core_entries();
        entries.extend([
            CourseGraphEntry::new("515", &[], &[]),
            CourseGraphEntry::new("547", &["592", "594", "595"], &[]),
            CourseGraphEntry::new("549", &["593", "595"], &[]),
            CourseGraphEntry::new("550", &["591", "592", "596"], &["596"]),
            CourseGraphEntry::new("581", &["591", "592", "593", "594"], &[]),
            CourseGraphEntry::new("542", &["592"], &[]),
        ]);
        Self::from_entries(entries)
    }

    /// Graph where every elective requires the full core
    pub fn core_first() -> Self {
        let mut entries = core_entries();
        entries.extend(
            DEFAULT_ELECTIVE_COURSES
                .iter()
                .map(|code| CourseGraphEntry::new(code, &DEFAULT_CORE_COURSES, &[])),
        );
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<CourseGraphEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.code.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Entries in source order
    pub fn entries(&self) -> &[CourseGraphEntry] {
        &self.entries
    }

    pub fn get(&self, code: &str) -> Option<&CourseGraphEntry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }

    /// Adjacency for external diagram rendering
    pub fn adjacency(&self) -> GraphAdjacency {
        let courses = self.entries.iter().map(|e| e.code.clone()).collect();

        let prerequisite_edges = self
            .entries
            .iter()
            .flat_map(|entry| {
                entry.prerequisites.iter().map(move |pre| PrerequisiteEdge {
                    prerequisite: pre.clone(),
                    course: entry.code.clone(),
                })
            })
            .collect();

        let corequisites = self
            .entries
            .iter()
            .filter(|entry| entry.has_corequisites())
            .map(|entry| CorequisiteAnnotation {
                course: entry.code.clone(),
                corequisites: entry.corequisites.clone(),
            })
            .collect();

        GraphAdjacency {
            courses,
            prerequisite_edges,
            corequisites,
        }
    }

    /// Codes referenced by the graph that are absent from `known`
    pub fn missing_from<'a>(&'a self, known: &HashSet<&str>) -> Vec<&'a str> {
        self.codes().filter(|code| !known.contains(code)).collect()
    }
}

impl TryFrom<Vec<CourseGraphEntry>> for CourseGraph {
    type Error = PolicyError;

    fn try_from(entries: Vec<CourseGraphEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<CourseGraph> for Vec<CourseGraphEntry> {
    fn from(graph: CourseGraph) -> Self {
        graph.entries
    }
}

/// Core sequence shared by both built-in policies
fn core_entries() -> Vec<CourseGraphEntry> {
    vec![
        CourseGraphEntry::new("591", &[], &[]),
        CourseGraphEntry::new("592", &[], &[]),
        CourseGraphEntry::new("593", &["591"], &["591"]),
        CourseGraphEntry::new("594", &["591"], &[]),
        CourseGraphEntry::new("595", &["593"], &[]),
        CourseGraphEntry::new("596", &["592", "594"], &["594"]),
    ]
}
