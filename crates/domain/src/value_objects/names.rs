//! Validated label newtypes for the location entity
//!
//! These newtypes ensure that labels are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for any label field
const MAX_LABEL_LENGTH: usize = 200;

macro_rules! define_label {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new validated value.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the value is empty or
            /// longer than 200 characters after trimming.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.len() > MAX_LABEL_LENGTH {
                    return Err(DomainError::validation(format!(
                        "{} cannot exceed {} characters",
                        $label, MAX_LABEL_LENGTH
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

define_label!(
    /// Free-text building label (e.g. "Main Campus Block A").
    BuildingName,
    "Building"
);

define_label!(
    /// Globally unique human-readable location name.
    LocationName,
    "Location name"
);

define_label!(
    /// Globally unique structured identifier such as `A-101-1`.
    ///
    /// Segments are separated by `-`; the prefix before the last delimiter
    /// conventionally names the parent location.
    LocationNumber,
    "Location number"
);
