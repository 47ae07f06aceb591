//! Request bodies for the location routes.
//!
//! Shape checks run through `validator` first; the value-object
//! constructors then enforce the domain rules.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use loctree_domain::{Area, BuildingName, LocationId, LocationName, LocationNumber};

use crate::use_cases::hierarchy::{LocationChanges, LocationFields};

use super::http::ApiError;

/// Body of `POST /location` and `PUT /location/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, message = "building should not be empty"))]
    pub building: String,
    #[validate(length(min = 1, message = "locationName should not be empty"))]
    pub location_name: String,
    #[validate(length(min = 1, message = "locationNumber should not be empty"))]
    pub location_number: String,
    #[validate(range(exclusive_min = 0.0, message = "area must be a positive number"))]
    pub area: f64,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

impl CreateLocationRequest {
    pub fn into_fields(self) -> Result<(LocationFields, Option<LocationId>), ApiError> {
        self.validate()?;

        let fields = LocationFields {
            building: BuildingName::new(self.building)?,
            location_name: LocationName::new(self.location_name)?,
            location_number: LocationNumber::new(self.location_number)?,
            area: Area::new(self.area)?,
        };
        Ok((fields, self.parent_id.map(LocationId::from_uuid)))
    }
}

/// Body of `PATCH /location/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatchLocationRequest {
    #[validate(length(min = 1, message = "building should not be empty"))]
    pub building: Option<String>,
    #[validate(length(min = 1, message = "locationName should not be empty"))]
    pub location_name: Option<String>,
    #[validate(length(min = 1, message = "locationNumber should not be empty"))]
    pub location_number: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "area must be a positive number"))]
    pub area: Option<f64>,
    pub parent_id: Option<Uuid>,
}

impl PatchLocationRequest {
    pub fn into_changes(self) -> Result<(LocationChanges, Option<LocationId>), ApiError> {
        self.validate()?;

        let changes = LocationChanges {
            building: self.building.map(BuildingName::new).transpose()?,
            location_name: self.location_name.map(LocationName::new).transpose()?,
            location_number: self.location_number.map(LocationNumber::new).transpose()?,
            area: self.area.map(Area::new).transpose()?,
        };
        Ok((changes, self.parent_id.map(LocationId::from_uuid)))
    }
}
