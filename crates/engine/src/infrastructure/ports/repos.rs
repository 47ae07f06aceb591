//! Repository port traits for database access.

use async_trait::async_trait;
use loctree_domain::{Location, LocationId, LocationNode};

use super::error::RepoError;

/// Field names reported by [`RepoError::DuplicateKey`].
pub const LOCATION_NAME_FIELD: &str = "locationName";
pub const LOCATION_NUMBER_FIELD: &str = "locationNumber";

// =============================================================================
// Location Storage
// =============================================================================

/// Persistence primitives over location records and their tree relation.
///
/// Implementations own no business logic. Every read must observe every
/// write previously completed through the same store, so a `save` followed
/// by `find_descendants` sees the new parent pointer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, RepoError>;

    /// Lookup by the unique structured number.
    async fn find_by_number(&self, number: &str) -> Result<Option<Location>, RepoError>;

    /// Every location without a parent, each with its full subtree attached.
    async fn find_roots(&self) -> Result<Vec<LocationNode>, RepoError>;

    /// Direct children of `id`.
    async fn find_children(&self, id: LocationId) -> Result<Vec<Location>, RepoError>;

    /// All transitive children of `id`, excluding `id` itself.
    async fn find_descendants(&self, id: LocationId) -> Result<Vec<Location>, RepoError>;

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    async fn find_ancestors(&self, id: LocationId) -> Result<Vec<Location>, RepoError>;

    /// Insert or update. Fails with `RepoError::DuplicateKey` when the name or
    /// number is taken by another record; nothing is written in that case.
    async fn save(&self, location: &Location) -> Result<Location, RepoError>;

    /// Overwrite an existing record. Fails with `RepoError::NotFound` when the
    /// row is gone and never inserts; uniqueness is checked as in `save`.
    async fn update_location(&self, location: &Location) -> Result<Location, RepoError>;

    /// Remove every listed location, or none of them.
    async fn remove_all(&self, ids: &[LocationId]) -> Result<(), RepoError>;
}
