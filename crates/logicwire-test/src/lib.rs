//! logicwire Test Harness - Circuit validation and benchmarking
//!
//! This crate provides:
//! - Testbenches with named switches and probes
//! - Seeded random stimulus
//! - Canned scenarios (latches, adders, flip-flops, 7400)
//! - End-to-end determinism checks

pub mod harness;
pub mod stimulus;
pub mod scenarios;
pub mod integration;

pub use harness::*;
pub use stimulus::*;
pub use scenarios::*;
pub use integration::*;
