//! Loctree domain: the location aggregate, its value objects and the
//! materialised tree views used by the hierarchy engine.

extern crate self as loctree_domain;

pub mod aggregates;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{Location, LocationNode};
pub use error::DomainError;
pub use ids::LocationId;
pub use value_objects::{Area, BuildingName, LocationName, LocationNumber};
