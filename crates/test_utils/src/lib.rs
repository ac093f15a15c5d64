//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! accounting core test suite.
//!
//! # Modules
//!
//! - `fixtures`: a pre-wired store with companies, journals, partners and
//!   products
//! - `builders`: builder patterns for test data construction
//! - `assertions`: custom assertion helpers for order quantities
//! - `logging`: one-time tracing initialisation for tests

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod logging;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use logging::*;
