//! Shared builders for engine tests.

use loctree_domain::{Area, BuildingName, Location, LocationName, LocationNumber};

use crate::use_cases::hierarchy::LocationFields;

/// A root location numbered `number`, named `Room <number>`.
pub fn location(number: &str) -> Location {
    Location::new(
        BuildingName::new("Block A").unwrap(),
        LocationName::new(format!("Room {number}")).unwrap(),
        LocationNumber::new(number).unwrap(),
        Area::new(10.0).unwrap(),
    )
}

/// Creation fields matching [`location`].
pub fn fields(number: &str) -> LocationFields {
    LocationFields {
        building: BuildingName::new("Block A").unwrap(),
        location_name: LocationName::new(format!("Room {number}")).unwrap(),
        location_number: LocationNumber::new(number).unwrap(),
        area: Area::new(10.0).unwrap(),
    }
}
