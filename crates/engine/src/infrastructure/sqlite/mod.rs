//! SQLite storage backends.

mod location_store;

pub use location_store::SqliteLocationStore;
