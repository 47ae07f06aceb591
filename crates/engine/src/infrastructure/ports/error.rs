//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A unique field collided with an existing record.
    ///
    /// `field` names the colliding field (`locationName` / `locationNumber`)
    /// when the backend reports it.
    #[error("{}", duplicate_message(.field))]
    DuplicateKey { field: Option<&'static str> },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Stored data could not be converted back into domain types.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn duplicate_message(field: &Option<&'static str>) -> String {
    match field {
        Some(field) => format!("Duplicate value for unique field {field}"),
        None => "Duplicate value for a unique field".to_string(),
    }
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn duplicate(field: Option<&'static str>) -> Self {
        Self::DuplicateKey { field }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
