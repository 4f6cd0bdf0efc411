//! Student model
//!
//! A student carries their academic history across terms. Once per term the
//! simulator calls `register_for_term`, which:
//! 1. asks the policy resolver for eligible courses
//! 2. draws courses at random until two seats are taken, the options run
//!    out, or the student decides to stop after one course
//! 3. folds the term's result into the history and re-checks graduation
//!
//! Full courses are not errors: they drop out of the option set and bump the
//! student's failed-attempt counter for that course.

use crate::models::catalog::CourseCatalog;
use crate::models::course::CourseError;
use crate::policy::{EligibilityResolver, DEFAULT_CORE_COURSES};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Seats a student may take in one term
pub const MAX_COURSES_PER_TERM: usize = 2;

/// Default chance of stopping after each successful registration
pub const DEFAULT_SINGLE_COURSE_PROBABILITY: f64 = 0.5;

/// Default number of distinct courses needed to graduate
pub const DEFAULT_MIN_COURSES_TO_GRADUATE: usize = 10;

/// Errors that can occur while a student registers
#[derive(Debug, Error, PartialEq)]
pub enum RegistrationError {
    #[error("Course {course} is eligible for student {student_id} but not offered in the catalog")]
    CourseNotInCatalog { student_id: usize, course: String },

    #[error("Student {0} has already graduated")]
    AlreadyGraduated(usize),

    #[error("Course error: {0}")]
    Course(#[from] CourseError),
}

/// Graduation requirements: a fixed core set plus a total course count
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::GraduationRule;
/// use std::collections::BTreeSet;
///
/// let rule = GraduationRule::default();
/// let mut taken: BTreeSet<String> = ["591", "592", "593", "594", "595", "596"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// assert!(!rule.is_satisfied(&taken)); // core done, only 6 courses
///
/// taken.extend(["515", "542", "547", "549"].iter().map(|s| s.to_string()));
/// assert!(rule.is_satisfied(&taken));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduationRule {
    core_courses: BTreeSet<String>,
    min_total_courses: usize,
}

impl GraduationRule {
    pub fn new(core_courses: impl IntoIterator<Item = String>, min_total_courses: usize) -> Self {
        Self {
            core_courses: core_courses.into_iter().collect(),
            min_total_courses,
        }
    }

    pub fn core_courses(&self) -> &BTreeSet<String> {
        &self.core_courses
    }

    pub fn min_total_courses(&self) -> usize {
        self.min_total_courses
    }

    /// Core set completed and enough distinct courses overall
    pub fn is_satisfied(&self, taken: &BTreeSet<String>) -> bool {
        self.core_courses.is_subset(taken) && taken.len() >= self.min_total_courses
    }
}

impl Default for GraduationRule {
    fn default() -> Self {
        Self::new(
            DEFAULT_CORE_COURSES.iter().map(|s| s.to_string()),
            DEFAULT_MIN_COURSES_TO_GRADUATE,
        )
    }
}

/// What happened to one student in one term
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermRegistration {
    pub term: usize,

    /// Courses registered, in the order they were taken
    pub selected: Vec<String>,

    /// Courses drawn but found full, in draw order
    pub full_courses: Vec<String>,

    /// True if this term completed the graduation requirements
    pub graduated: bool,
}

impl TermRegistration {
    /// Zero courses registered (forced leave of absence)
    pub fn is_leave_of_absence(&self) -> bool {
        self.selected.is_empty()
    }
}

/// A student in the program
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::{
///     CourseCatalog, EligibilityResolver, GraduationRule, RngManager, Student,
/// };
///
/// let resolver = EligibilityResolver::new("no-restrictions").unwrap();
/// let core: Vec<String> = ["591", "592", "593", "594", "595", "596"]
///     .iter().map(|s| s.to_string()).collect();
/// let electives: Vec<String> = ["515", "547", "549", "550", "581", "542"]
///     .iter().map(|s| s.to_string()).collect();
/// let mut catalog = CourseCatalog::from_lists(&core, 350, &electives, 50).unwrap();
/// let mut rng = RngManager::new(7);
///
/// let mut student = Student::new(0, 0);
/// let outcome = student
///     .register_for_term(0, &resolver, &mut catalog, &GraduationRule::default(), &mut rng)
///     .unwrap();
///
/// assert!(!outcome.selected.is_empty());
/// assert_eq!(student.terms_attended(), 1);
/// assert!(!student.is_graduated());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Sequential identifier, unique within a replicate
    id: usize,

    /// Term in which the student was admitted
    admitted_term: usize,

    /// Courses successfully completed (only grows)
    courses_taken: BTreeSet<String>,

    /// Course code → number of times it was drawn while full
    failed_attempts: BTreeMap<String, usize>,

    /// Terms in which the student went through registration
    terms_attended: usize,

    /// Terms in which the student registered for nothing
    leaves_of_absence: usize,

    /// Monotonic: false → true, never back
    graduated: bool,

    /// Term in which `graduated` flipped
    graduation_term: Option<usize>,

    /// Chance of stopping after each successful registration
    single_course_probability: f64,
}

impl Student {
    /// Create a student with the default single-course probability
    pub fn new(id: usize, admitted_term: usize) -> Self {
        Self::with_single_course_probability(id, admitted_term, DEFAULT_SINGLE_COURSE_PROBABILITY)
    }

    pub fn with_single_course_probability(
        id: usize,
        admitted_term: usize,
        single_course_probability: f64,
    ) -> Self {
        Self {
            id,
            admitted_term,
            courses_taken: BTreeSet::new(),
            failed_attempts: BTreeMap::new(),
            terms_attended: 0,
            leaves_of_absence: 0,
            graduated: false,
            graduation_term: None,
            single_course_probability,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn admitted_term(&self) -> usize {
        self.admitted_term
    }

    pub fn courses_taken(&self) -> &BTreeSet<String> {
        &self.courses_taken
    }

    pub fn failed_attempts(&self) -> &BTreeMap<String, usize> {
        &self.failed_attempts
    }

    /// Failed attempts summed over all courses
    pub fn total_failed_attempts(&self) -> usize {
        self.failed_attempts.values().sum()
    }

    pub fn terms_attended(&self) -> usize {
        self.terms_attended
    }

    pub fn leaves_of_absence(&self) -> usize {
        self.leaves_of_absence
    }

    pub fn is_graduated(&self) -> bool {
        self.graduated
    }

    pub fn graduation_term(&self) -> Option<usize> {
        self.graduation_term
    }

    pub fn single_course_probability(&self) -> f64 {
        self.single_course_probability
    }

    /// Run this student's registration for `term`
    ///
    /// Seats are taken in `catalog` as courses are committed, so students
    /// registering later in the same term see the reduced capacity.
    ///
    /// # Errors
    /// - `RegistrationError::AlreadyGraduated` if called after graduation
    /// - `RegistrationError::CourseNotInCatalog` if the policy offers a
    ///   course the catalog does not carry
    pub fn register_for_term(
        &mut self,
        term: usize,
        resolver: &EligibilityResolver,
        catalog: &mut CourseCatalog,
        rule: &GraduationRule,
        rng: &mut RngManager,
    ) -> Result<TermRegistration, RegistrationError> {
        if self.graduated {
            return Err(RegistrationError::AlreadyGraduated(self.id));
        }

        let mut full_courses = Vec::new();
        let selected = self.choose_courses(resolver, catalog, rng, &mut full_courses)?;
        let graduated = self.update_after_term(term, &selected, rule);

        Ok(TermRegistration {
            term,
            selected,
            full_courses,
            graduated,
        })
    }

    fn choose_courses(
        &mut self,
        resolver: &EligibilityResolver,
        catalog: &mut CourseCatalog,
        rng: &mut RngManager,
        full_courses: &mut Vec<String>,
    ) -> Result<Vec<String>, RegistrationError> {
        let mut options = resolver.eligible_courses(&self.courses_taken);
        let mut selected: Vec<String> = Vec::with_capacity(MAX_COURSES_PER_TERM);

        while selected.len() < MAX_COURSES_PER_TERM && !options.is_empty() {
            let pick = rng.choose_index(options.len());
            let code = match options.key_at(pick) {
                Some(code) => code.to_string(),
                None => break,
            };

            let course = catalog
                .get_mut(&code)
                .ok_or_else(|| RegistrationError::CourseNotInCatalog {
                    student_id: self.id,
                    course: code.clone(),
                })?;

            if course.is_full() {
                options.remove(&code);
                *self.failed_attempts.entry(code.clone()).or_insert(0) += 1;
                full_courses.push(code);
                continue;
            }

            course.enroll()?;
            let companions = options.remove(&code).unwrap_or_default();
            for companion in companions.iter().filter(|c| **c != code) {
                options.unlock(companion);
            }
            selected.push(code);

            if rng.chance(self.single_course_probability) {
                break;
            }
        }

        Ok(selected)
    }

    /// Fold one term's registrations into the history
    ///
    /// Returns true if the student graduated with this update.
    pub fn update_after_term(
        &mut self,
        term: usize,
        selected: &[String],
        rule: &GraduationRule,
    ) -> bool {
        self.terms_attended += 1;
        self.courses_taken.extend(selected.iter().cloned());

        if selected.is_empty() {
            self.leaves_of_absence += 1;
        }

        if !self.graduated && rule.is_satisfied(&self.courses_taken) {
            self.graduated = true;
            self.graduation_term = Some(term);
            return true;
        }
        false
    }
}
