//! Aggregates - entities with identity and invariants.

pub mod location;
mod tree;

pub use location::Location;
pub use tree::LocationNode;
