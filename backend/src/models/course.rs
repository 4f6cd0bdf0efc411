//! Course offering model
//!
//! A `Course` is the seat counter for one offering in the current term.
//! Students check `is_full()` before calling `enroll()`; enrolling into a
//! full course is rejected with `CourseError::CapacityExceeded` instead of
//! silently overbooking.
//!
//! CRITICAL: `enrolled <= capacity` holds at every observation point.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during course and catalog operations
#[derive(Debug, Error, PartialEq)]
pub enum CourseError {
    #[error("Course {course} is full: capacity {capacity}")]
    CapacityExceeded { course: String, capacity: usize },

    #[error("Course {0} appears more than once in the catalog")]
    DuplicateCourse(String),
}

/// Capacity-bounded seat counter for one course offering
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::Course;
///
/// let mut course = Course::new("591".to_string(), 2);
/// course.enroll().unwrap();
/// course.enroll().unwrap();
/// assert!(course.is_full());
/// assert!(course.enroll().is_err());
///
/// course.reset_enrollment();
/// assert_eq!(course.enrolled(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course code (e.g., "591")
    id: String,

    /// Seats offered per term, fixed at construction
    capacity: usize,

    /// Seats taken so far this term
    enrolled: usize,
}

impl Course {
    /// Create a course with `capacity` seats and no enrollment
    ///
    /// # Panics
    /// Panics if `capacity` is zero. Configuration validation rejects
    /// zero capacities before any course is built.
    pub fn new(id: String, capacity: usize) -> Self {
        assert!(capacity > 0, "course capacity must be positive");
        Self {
            id,
            capacity,
            enrolled: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn enrolled(&self) -> usize {
        self.enrolled
    }

    /// Seats still open this term
    pub fn seats_remaining(&self) -> usize {
        self.capacity.saturating_sub(self.enrolled)
    }

    /// True iff every seat is taken
    pub fn is_full(&self) -> bool {
        self.enrolled >= self.capacity
    }

    /// Take one seat
    ///
    /// # Errors
    /// `CourseError::CapacityExceeded` if the course is already full; the
    /// counter is left unchanged.
    pub fn enroll(&mut self) -> Result<(), CourseError> {
        if self.is_full() {
            return Err(CourseError::CapacityExceeded {
                course: self.id.clone(),
                capacity: self.capacity,
            });
        }
        self.enrolled += 1;
        Ok(())
    }

    /// Zero the seat counter (start of a new term)
    pub fn reset_enrollment(&mut self) {
        self.enrolled = 0;
    }
}
