//! In-memory storage backends.

mod location_store;

pub use location_store::InMemoryLocationStore;
