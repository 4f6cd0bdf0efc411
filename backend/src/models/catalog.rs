//! Course catalog
//!
//! Holds every `Course` offered by the program, in configuration order.
//! The simulator owns one catalog per replicate run and resets all seat
//! counters between terms. Students only ever touch it through
//! `is_full()` / `enroll()` on individual courses.

use crate::models::course::{Course, CourseError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Which capacity bucket a course belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseCategory {
    Core,
    Elective,
}

/// All course offerings, indexed by code
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::CourseCatalog;
///
/// let core = vec!["591".to_string(), "592".to_string()];
/// let electives = vec!["515".to_string()];
/// let catalog = CourseCatalog::from_lists(&core, 350, &electives, 50).unwrap();
///
/// assert_eq!(catalog.len(), 3);
/// assert_eq!(catalog.get("515").unwrap().capacity(), 50);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    categories: Vec<CourseCategory>,
    index: HashMap<String, usize>,
}

impl CourseCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from core and elective code lists
    ///
    /// # Errors
    /// `CourseError::DuplicateCourse` if a code is listed twice.
    pub fn from_lists(
        core_courses: &[String],
        core_capacity: usize,
        elective_courses: &[String],
        elective_capacity: usize,
    ) -> Result<Self, CourseError> {
        let mut catalog = Self::new();
        for code in core_courses {
            catalog.add_course(Course::new(code.clone(), core_capacity), CourseCategory::Core)?;
        }
        for code in elective_courses {
            catalog.add_course(
                Course::new(code.clone(), elective_capacity),
                CourseCategory::Elective,
            )?;
        }
        Ok(catalog)
    }

    /// Add a course
    ///
    /// # Errors
    /// `CourseError::DuplicateCourse` if the code is already present.
    pub fn add_course(
        &mut self,
        course: Course,
        category: CourseCategory,
    ) -> Result<(), CourseError> {
        if self.index.contains_key(course.id()) {
            return Err(CourseError::DuplicateCourse(course.id().to_string()));
        }
        self.index.insert(course.id().to_string(), self.courses.len());
        self.courses.push(course);
        self.categories.push(category);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&Course> {
        self.index.get(code).map(|&i| &self.courses[i])
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Course> {
        match self.index.get(code) {
            Some(&i) => Some(&mut self.courses[i]),
            None => None,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn category(&self, code: &str) -> Option<CourseCategory> {
        self.index.get(code).map(|&i| self.categories[i])
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    /// Course codes in configuration order
    pub fn codes(&self) -> Vec<&str> {
        self.courses.iter().map(|c| c.id()).collect()
    }

    /// Zero every seat counter
    pub fn reset_all(&mut self) {
        for course in &mut self.courses {
            course.reset_enrollment();
        }
    }

    /// Seats taken per course right now
    pub fn enrollment_snapshot(&self) -> BTreeMap<String, usize> {
        self.courses
            .iter()
            .map(|c| (c.id().to_string(), c.enrolled()))
            .collect()
    }

    /// Seats taken across all courses
    pub fn total_enrolled(&self) -> usize {
        self.courses.iter().map(|c| c.enrolled()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_across_categories_rejected() {
        let result = CourseCatalog::from_lists(&codes(&["591", "592"]), 10, &codes(&["592"]), 5);
        assert_eq!(result.unwrap_err(), CourseError::DuplicateCourse("592".to_string()));
    }

    #[test]
    fn test_categories_and_order_preserved() {
        let catalog =
            CourseCatalog::from_lists(&codes(&["593", "591"]), 10, &codes(&["515"]), 5).unwrap();
        assert_eq!(catalog.codes(), vec!["593", "591", "515"]);
        assert_eq!(catalog.category("591"), Some(CourseCategory::Core));
        assert_eq!(catalog.category("515"), Some(CourseCategory::Elective));
        assert_eq!(catalog.category("999"), None);
    }

    #[test]
    fn test_reset_all_zeroes_every_course() {
        let mut catalog =
            CourseCatalog::from_lists(&codes(&["591"]), 3, &codes(&["515"]), 2).unwrap();
        catalog.get_mut("591").unwrap().enroll().unwrap();
        catalog.get_mut("515").unwrap().enroll().unwrap();
        assert_eq!(catalog.total_enrolled(), 2);

        catalog.reset_all();
        assert!(catalog.iter().all(|c| c.enrolled() == 0));
        assert_eq!(catalog.total_enrolled(), 0);
    }
}
