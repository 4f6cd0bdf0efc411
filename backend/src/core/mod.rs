//! Simulation time

pub mod term;
