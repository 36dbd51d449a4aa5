//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The in-memory repositories mirror the guards of the Postgres adapters
//! (unique keys, conditional stock movements) so service tests exercise the
//! same failure paths.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
