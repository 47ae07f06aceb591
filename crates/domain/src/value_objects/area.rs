//! Floor area value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Floor area in square units. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Area(f64);

impl Area {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is not finite or is `<= 0`.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::validation("Area must be a finite number"));
        }
        if value <= 0.0 {
            return Err(DomainError::validation("Area must be greater than zero"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Area {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Area> for f64 {
    fn from(area: Area) -> f64 {
        area.0
    }
}
