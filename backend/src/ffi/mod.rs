//! FFI (Foreign Function Interface) module
//!
//! PyO3 bindings handing replicate rosters to Python-side analysis.
//!
//! # Design Principles
//!
//! 1. **Minimal boundary**: configure, run, read rosters
//! 2. **Simple types**: primitives, strings, dicts and lists at the boundary
//! 3. **Safe errors**: every Rust error becomes a Python exception
//! 4. **No references**: Python gets copies, never references to Rust state

pub mod simulator;
pub mod types;
