//! Term management for the simulation
//!
//! The simulation advances in whole academic terms. Each term every active
//! student registers once, then course seat counters are reset.

use serde::{Deserialize, Serialize};

/// Counts terms up to a fixed horizon
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::TermClock;
///
/// let mut clock = TermClock::new(3);
/// assert_eq!(clock.current_term(), 0);
///
/// while !clock.is_finished() {
///     clock.advance_term();
/// }
/// assert_eq!(clock.current_term(), 3);
/// assert_eq!(clock.remaining_terms(), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermClock {
    /// Index of the term currently being simulated (0-based)
    current_term: usize,
    /// Number of terms in the simulation horizon
    num_terms: usize,
}

impl TermClock {
    /// Create a clock for a horizon of `num_terms` terms
    ///
    /// A zero-term horizon is valid and is finished immediately.
    pub fn new(num_terms: usize) -> Self {
        Self {
            current_term: 0,
            num_terms,
        }
    }

    /// Move to the next term
    ///
    /// Saturates at the horizon.
    pub fn advance_term(&mut self) {
        if self.current_term < self.num_terms {
            self.current_term += 1;
        }
    }

    /// Current term index
    pub fn current_term(&self) -> usize {
        self.current_term
    }

    /// Number of terms in the horizon
    pub fn num_terms(&self) -> usize {
        self.num_terms
    }

    /// Terms left before the horizon is reached
    pub fn remaining_terms(&self) -> usize {
        self.num_terms - self.current_term
    }

    /// True once every term in the horizon has run
    pub fn is_finished(&self) -> bool {
        self.current_term >= self.num_terms
    }
}
