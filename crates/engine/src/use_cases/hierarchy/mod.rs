//! Location hierarchy use cases.
//!
//! Keeps the parent relation a forest while locations are created,
//! reparented and removed:
//!
//! - [`HierarchyResolver`] works out a record's parent (explicit id or
//!   inferred from the structured number)
//! - [`CycleGuard`] rejects a parent that is the node itself or one of its
//!   descendants
//! - [`HierarchyService`] orchestrates both against the [`LocationStore`]
//!
//! [`LocationStore`]: crate::infrastructure::ports::LocationStore

mod cycle_guard;
mod resolve_parent;
mod service;

pub use cycle_guard::CycleGuard;
pub use resolve_parent::{parent_number, HierarchyResolver, NUMBER_DELIMITER};
pub use service::HierarchyService;

use loctree_domain::{Area, BuildingName, Location, LocationId, LocationName, LocationNumber};

use crate::infrastructure::ports::RepoError;

/// Failure kinds surfaced by the hierarchy engine.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("No location with ID {0}")]
    NotFound(LocationId),

    #[error("No parent location with ID {0}")]
    ParentNotFound(LocationId),

    #[error("Location {parent_id} is {id} itself or one of its descendants")]
    CyclicParent {
        id: LocationId,
        parent_id: LocationId,
    },

    #[error("{}", duplicate_message(.field))]
    DuplicateKey { field: Option<&'static str> },

    #[error("Failed to remove descendants of location {id}: {source}")]
    RemovalFailed {
        id: LocationId,
        #[source]
        source: RepoError,
    },

    #[error("Repository error: {0}")]
    Repo(RepoError),
}

fn duplicate_message(field: &Option<&'static str>) -> String {
    match field {
        Some(field) => format!("A location with the same {field} already exists"),
        None => "A location with the same name or number already exists".to_string(),
    }
}

impl From<RepoError> for HierarchyError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateKey { field } => Self::DuplicateKey { field },
            other => Self::Repo(other),
        }
    }
}

/// Validated scalar fields of a new location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFields {
    pub building: BuildingName,
    pub location_name: LocationName,
    pub location_number: LocationNumber,
    pub area: Area,
}

impl LocationFields {
    /// A transient, parentless location carrying these fields.
    pub fn into_location(self) -> Location {
        Location::new(
            self.building,
            self.location_name,
            self.location_number,
            self.area,
        )
    }
}

/// Scalar changes for an existing location. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationChanges {
    pub building: Option<BuildingName>,
    pub location_name: Option<LocationName>,
    pub location_number: Option<LocationNumber>,
    pub area: Option<Area>,
}

impl LocationChanges {
    pub fn is_empty(&self) -> bool {
        self.building.is_none()
            && self.location_name.is_none()
            && self.location_number.is_none()
            && self.area.is_none()
    }

    pub fn apply_to(self, location: &mut Location) {
        if let Some(building) = self.building {
            location.set_building(building);
        }
        if let Some(location_name) = self.location_name {
            location.set_location_name(location_name);
        }
        if let Some(location_number) = self.location_number {
            location.set_location_number(location_number);
        }
        if let Some(area) = self.area {
            location.set_area(area);
        }
    }
}

/// A full replacement touches every scalar field.
impl From<LocationFields> for LocationChanges {
    fn from(fields: LocationFields) -> Self {
        Self {
            building: Some(fields.building),
            location_name: Some(fields.location_name),
            location_number: Some(fields.location_number),
            area: Some(fields.area),
        }
    }
}
