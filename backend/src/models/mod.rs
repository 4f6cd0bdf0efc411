//! Domain models for the cohort simulator

pub mod catalog;
pub mod course;
pub mod event;
pub mod student;

// Re-exports
pub use catalog::{CourseCatalog, CourseCategory};
pub use course::{Course, CourseError};
pub use event::{Event, EventLog};
pub use student::{GraduationRule, RegistrationError, Student, TermRegistration};
