//! Eligible-course options
//!
//! `CourseOptions` is the working set a student draws from during one
//! registration pass: each key is a course the student may pick directly,
//! mapped to the companion courses that become takeable in the same term if
//! that key is picked (corequisite unlocks).
//!
//! Entries keep insertion order. Random draws index into that order, so a
//! fixed seed replays the same picks.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered mapping: course code → companion course codes
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::policy::CourseOptions;
///
/// let mut options = CourseOptions::new();
/// options.insert_if_absent("591");
/// options.add_companion("591", "593");
///
/// assert_eq!(options.companions("591"), Some(&["593".to_string()][..]));
/// let unlocked = options.remove("591").unwrap();
/// assert_eq!(unlocked, vec!["593".to_string()]);
/// assert!(options.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseOptions {
    entries: Vec<(String, Vec<String>)>,
}

impl CourseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == code)
    }

    /// Add `code` as directly selectable with no companions
    ///
    /// Leaves an existing entry (and its companions) untouched.
    /// Returns true if the entry was new.
    pub fn insert_if_absent(&mut self, code: &str) -> bool {
        if self.contains(code) {
            return false;
        }
        self.entries.push((code.to_string(), Vec::new()));
        true
    }

    /// Make `code` selectable with an empty companion list
    ///
    /// Replaces the companion list of an existing entry.
    pub fn unlock(&mut self, code: &str) {
        match self.position(code) {
            Some(i) => self.entries[i].1.clear(),
            None => self.entries.push((code.to_string(), Vec::new())),
        }
    }

    /// Register `companion` as takeable alongside `key`
    ///
    /// Creates the `key` entry if needed. A companion is recorded at most once
    /// per key.
    pub fn add_companion(&mut self, key: &str, companion: &str) {
        let i = match self.position(key) {
            Some(i) => i,
            None => {
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        let companions = &mut self.entries[i].1;
        if !companions.iter().any(|c| c == companion) {
            companions.push(companion.to_string());
        }
    }

    /// Remove `code`, returning its companions
    pub fn remove(&mut self, code: &str) -> Option<Vec<String>> {
        self.position(code).map(|i| self.entries.remove(i).1)
    }

    /// Key at position `index` in insertion order
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(key, _)| key.as_str())
    }

    pub fn companions(&self, code: &str) -> Option<&[String]> {
        self.position(code).map(|i| self.entries[i].1.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, companions)| (key.as_str(), companions.as_slice()))
    }
}

impl Serialize for CourseOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, companions) in &self.entries {
            map.serialize_entry(code, companions)?;
        }
        map.end()
    }
}
