//! Event logging for replicate replay and inspection.
//!
//! Every significant registration outcome in a replicate is recorded as an
//! `Event`. The log is cleared at the start of each replicate, so after a run
//! it holds the full history of the most recent replicate:
//! - **Admitted**: a new student joins the active roster
//! - **Enrolled**: a seat was taken
//! - **CourseFull**: a drawn course had no seats left
//! - **LeaveOfAbsence**: a student registered for nothing this term
//! - **Graduated**: graduation requirements met
//! - **TermClosed**: per-course enrollment just before seats reset
//!
//! # Example
//!
//! ```rust
//! use cohort_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::Enrolled { term: 2, student_id: 17, course: "591".to_string() });
//!
//! assert_eq!(log.events_for_student(17).len(), 1);
//! assert_eq!(log.events_at_term(2)[0].event_type(), "Enrolled");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simulation event capturing a registration outcome.
///
/// Events are logged in the order they occur within a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Admitted {
        term: usize,
        student_id: usize,
    },

    Enrolled {
        term: usize,
        student_id: usize,
        course: String,
    },

    /// Course drawn while full; counts as one failed attempt
    CourseFull {
        term: usize,
        student_id: usize,
        course: String,
    },

    LeaveOfAbsence {
        term: usize,
        student_id: usize,
    },

    Graduated {
        term: usize,
        student_id: usize,
        terms_attended: usize,
    },

    /// Registration finished for the term; snapshot taken before reset
    TermClosed {
        term: usize,
        active_students: usize,
        enrollments: BTreeMap<String, usize>,
    },
}

impl Event {
    /// Term in which the event occurred
    pub fn term(&self) -> usize {
        match self {
            Event::Admitted { term, .. } => *term,
            Event::Enrolled { term, .. } => *term,
            Event::CourseFull { term, .. } => *term,
            Event::LeaveOfAbsence { term, .. } => *term,
            Event::Graduated { term, .. } => *term,
            Event::TermClosed { term, .. } => *term,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Admitted { .. } => "Admitted",
            Event::Enrolled { .. } => "Enrolled",
            Event::CourseFull { .. } => "CourseFull",
            Event::LeaveOfAbsence { .. } => "LeaveOfAbsence",
            Event::Graduated { .. } => "Graduated",
            Event::TermClosed { .. } => "TermClosed",
        }
    }

    pub fn student_id(&self) -> Option<usize> {
        match self {
            Event::Admitted { student_id, .. }
            | Event::Enrolled { student_id, .. }
            | Event::CourseFull { student_id, .. }
            | Event::LeaveOfAbsence { student_id, .. }
            | Event::Graduated { student_id, .. } => Some(*student_id),
            Event::TermClosed { .. } => None,
        }
    }

    pub fn course(&self) -> Option<&str> {
        match self {
            Event::Enrolled { course, .. } | Event::CourseFull { course, .. } => Some(course),
            _ => None,
        }
    }
}

/// Event log for storing and querying registration events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_at_term(&self, term: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.term() == term).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_student(&self, student_id: usize) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.student_id() == Some(student_id))
            .collect()
    }

    pub fn events_for_course(&self, course: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.course() == Some(course))
            .collect()
    }

    /// Per-term enrollment snapshots, in term order
    pub fn enrollment_series(&self) -> Vec<(usize, &BTreeMap<String, usize>)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::TermClosed {
                    term, enrollments, ..
                } => Some((*term, enrollments)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
