//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of a mocking framework? The port traits take
//! `&str` and reference parameters that macro-generated mocks handle
//! poorly, and the in-memory implementations double as an executable
//! description of each repository's contract (including the guarded
//! ledger semantics).
//!
//! Note: for E2E tests with axum-test the AppState would need to be made
//! generic over the mock repositories. Service-level tests cover the
//! business rules; the Postgres adapters stay thin.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
