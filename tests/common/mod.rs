//! Common test utilities for mutator-math.
//!
//! Shared helpers for the integration tests: float assertions and design
//! space fixtures.

pub mod assertions;
pub mod test_data;
