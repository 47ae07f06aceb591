//! Port traits for infrastructure boundaries.
//!
//! Storage is the only abstraction in the engine. Everything else is a
//! concrete type. The store port exists so the in-memory and SQLite
//! backends can be swapped without touching the hierarchy logic.

mod error;
mod repos;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{LocationStore, LOCATION_NAME_FIELD, LOCATION_NUMBER_FIELD};

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::MockLocationStore;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
