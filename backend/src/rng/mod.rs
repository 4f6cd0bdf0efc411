//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, reproducible draws.
//! CRITICAL: Every random decision in a replicate (registration order,
//! course picks, the single-course stopping rule) MUST go through this module.

mod xorshift;

pub use xorshift::RngManager;
