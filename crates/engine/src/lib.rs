//! Loctree engine library.
//!
//! Keeps a forest of locations consistent while they are created,
//! reparented and removed.
//!
//! ## Structure
//!
//! - `use_cases/` - Hierarchy rules (parent resolution, cycle checks, cascades)
//! - `infrastructure/` - Store port, in-memory and SQLite backends, config
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Shared builders for unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
