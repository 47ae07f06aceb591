//! Value objects - immutable, validated-by-construction field types.

mod area;
mod names;

pub use area::Area;
pub use names::{BuildingName, LocationName, LocationNumber};
