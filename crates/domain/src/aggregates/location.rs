//! Location aggregate - Buildings, rooms and sub-areas
//!
//! # Hierarchy
//!
//! A location points at most one parent through `parent_id`. Children are
//! never stored on the aggregate; they are derived from the parent pointers
//! and materialised as a [`LocationNode`](super::LocationNode) tree when a
//! caller needs them.
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: All fields are encapsulated
//! - **Newtypes**: labels and area are validated value objects
//! - **Valid by construction**: `new()` takes pre-validated types

use serde::{Deserialize, Serialize};

use crate::value_objects::{Area, BuildingName, LocationName, LocationNumber};
use crate::LocationId;

/// A physical location
///
/// # Invariants
///
/// - `building`, `location_name` and `location_number` are non-empty and
///   trimmed (enforced by their newtypes)
/// - `area` is finite and strictly positive (enforced by `Area`)
/// - `parent_id` never equals `id` once persisted through the hierarchy service
///
/// # Example
///
/// ```
/// use loctree_domain::Location;
/// use loctree_domain::value_objects::{Area, BuildingName, LocationName, LocationNumber};
///
/// let location = Location::new(
///     BuildingName::new("Block A").unwrap(),
///     LocationName::new("Lecture Hall").unwrap(),
///     LocationNumber::new("A-101").unwrap(),
///     Area::new(120.5).unwrap(),
/// );
///
/// assert_eq!(location.location_number().as_str(), "A-101");
/// assert!(location.is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    id: LocationId,
    building: BuildingName,
    location_name: LocationName,
    location_number: LocationNumber,
    area: Area,
    parent_id: Option<LocationId>,
}

impl Location {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a new root location with a fresh identifier.
    pub fn new(
        building: BuildingName,
        location_name: LocationName,
        location_number: LocationNumber,
        area: Area,
    ) -> Self {
        Self {
            id: LocationId::new(),
            building,
            location_name,
            location_number,
            area,
            parent_id: None,
        }
    }

    /// Reconstruct a location from storage.
    pub fn from_parts(
        id: LocationId,
        building: BuildingName,
        location_name: LocationName,
        location_number: LocationNumber,
        area: Area,
        parent_id: Option<LocationId>,
    ) -> Self {
        Self {
            id,
            building,
            location_name,
            location_number,
            area,
            parent_id,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn building(&self) -> &BuildingName {
        &self.building
    }

    pub fn location_name(&self) -> &LocationName {
        &self.location_name
    }

    pub fn location_number(&self) -> &LocationNumber {
        &self.location_number
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn parent_id(&self) -> Option<LocationId> {
        self.parent_id
    }

    /// Returns true when the location has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_parent(mut self, parent_id: Option<LocationId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_building(&mut self, building: BuildingName) {
        self.building = building;
    }

    pub fn set_location_name(&mut self, location_name: LocationName) {
        self.location_name = location_name;
    }

    pub fn set_location_number(&mut self, location_number: LocationNumber) {
        self.location_number = location_number;
    }

    pub fn set_area(&mut self, area: Area) {
        self.area = area;
    }

    /// Reassign the parent pointer. Cycle checks are the caller's job.
    pub fn set_parent(&mut self, parent_id: Option<LocationId>) {
        self.parent_id = parent_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_location(number: &str) -> Location {
        Location::new(
            BuildingName::new("Block A").unwrap(),
            LocationName::new(format!("Room {number}")).unwrap(),
            LocationNumber::new(number).unwrap(),
            Area::new(42.0).unwrap(),
        )
    }

    #[test]
    fn new_location_is_a_root() {
        let location = create_test_location("A-1");
        assert!(location.is_root());
        assert_eq!(location.parent_id(), None);
        assert_eq!(location.area().value(), 42.0);
    }

    #[test]
    fn new_locations_get_distinct_ids() {
        assert_ne!(create_test_location("A").id(), create_test_location("B").id());
    }

    #[test]
    fn set_parent_changes_only_the_pointer() {
        let parent = create_test_location("A");
        let mut child = create_test_location("A-1");
        let id = child.id();

        child.set_parent(Some(parent.id()));

        assert_eq!(child.id(), id);
        assert_eq!(child.parent_id(), Some(parent.id()));
        assert!(!child.is_root());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let parent = create_test_location("A");
        let child = create_test_location("A-1").with_parent(Some(parent.id()));

        let json = serde_json::to_value(&child).unwrap();

        assert_eq!(json["locationNumber"], "A-1");
        assert_eq!(json["locationName"], "Room A-1");
        assert_eq!(json["building"], "Block A");
        assert_eq!(json["area"], 42.0);
        assert_eq!(json["parentId"], parent.id().to_string());
    }

    #[test]
    fn deserialization_rejects_invalid_area() {
        let json = serde_json::json!({
            "id": LocationId::new().to_string(),
            "building": "Block A",
            "locationName": "Hall",
            "locationNumber": "A",
            "area": 0.0,
            "parentId": null
        });
        assert!(serde_json::from_value::<Location>(json).is_err());
    }
}
