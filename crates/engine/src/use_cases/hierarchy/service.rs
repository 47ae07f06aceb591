//! Hierarchy service - create, update and remove locations without ever
//! breaking the forest invariant.

use std::sync::Arc;

use tokio::sync::Mutex;

use loctree_domain::{Location, LocationId, LocationNode};

use super::{CycleGuard, HierarchyError, HierarchyResolver, LocationChanges, LocationFields};
use crate::infrastructure::ports::{LocationStore, RepoError};

/// Orchestrates parent resolution, cycle checks and cascading removal.
///
/// The service keeps no state of its own apart from `structure_lock`, which
/// serializes every mutation inside this process. Each mutation holds it from
/// its first read (the record, the parent it resolves, the descendant set)
/// until its write lands, so no decision is taken on a stale view of the tree.
pub struct HierarchyService {
    store: Arc<dyn LocationStore>,
    resolver: HierarchyResolver,
    cycle_guard: CycleGuard,
    structure_lock: Mutex<()>,
}

impl HierarchyService {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self {
            resolver: HierarchyResolver::new(store.clone()),
            cycle_guard: CycleGuard::new(store.clone()),
            store,
            structure_lock: Mutex::new(()),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every root location with its full subtree.
    pub async fn list_roots(&self) -> Result<Vec<LocationNode>, HierarchyError> {
        Ok(self.store.find_roots().await?)
    }

    /// A location with its direct children.
    pub async fn get(&self, id: LocationId) -> Result<LocationNode, HierarchyError> {
        let location = self.load(id).await?;
        let children = self.store.find_children(id).await?;
        Ok(LocationNode::with_children(location, children))
    }

    /// Parent chain of `id`, nearest first.
    pub async fn ancestors(&self, id: LocationId) -> Result<Vec<Location>, HierarchyError> {
        self.load(id).await?;
        Ok(self.store.find_ancestors(id).await?)
    }

    /// Every transitive child of `id`.
    pub async fn descendants(&self, id: LocationId) -> Result<Vec<Location>, HierarchyError> {
        self.load(id).await?;
        Ok(self.store.find_descendants(id).await?)
    }

    async fn load(&self, id: LocationId) -> Result<Location, HierarchyError> {
        match self.store.get_location(id).await? {
            Some(location) => Ok(location),
            None => {
                tracing::warn!(location_id = %id, "Location not found");
                Err(HierarchyError::NotFound(id))
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a location under its resolved parent (or as a root).
    pub async fn create(
        &self,
        fields: LocationFields,
        parent_id: Option<LocationId>,
    ) -> Result<Location, HierarchyError> {
        let mut location = fields.into_location();

        let _guard = self.structure_lock.lock().await;

        let parent = self
            .resolver
            .resolve_parent(parent_id, location.location_number().as_str())
            .await?;
        location.set_parent(parent.as_ref().map(Location::id));

        let saved = self.store.save(&location).await.map_err(|e| {
            tracing::warn!(error = %e, number = %location.location_number(), "Failed to create location");
            HierarchyError::from(e)
        })?;

        tracing::info!(
            location_id = %saved.id(),
            parent_id = ?saved.parent_id(),
            number = %saved.location_number(),
            "Created location"
        );
        Ok(saved)
    }

    /// Apply `changes` to a location and, when the resolved parent differs
    /// from the current one, reparent it.
    ///
    /// The candidate parent comes from `parent_id`, or else from the
    /// (possibly changed) location number. No candidate, or the current
    /// parent again, keeps the existing parent.
    pub async fn update(
        &self,
        id: LocationId,
        changes: LocationChanges,
        parent_id: Option<LocationId>,
    ) -> Result<Location, HierarchyError> {
        let _guard = self.structure_lock.lock().await;

        let mut location = self.load(id).await?;

        let number = changes
            .location_number
            .as_ref()
            .unwrap_or(location.location_number())
            .as_str()
            .to_string();
        let candidate = self.resolver.resolve_parent(parent_id, &number).await?;
        let new_parent = candidate.filter(|p| Some(p.id()) != location.parent_id());

        if changes.is_empty() && new_parent.is_none() {
            tracing::debug!(location_id = %id, "Nothing to update");
            return Ok(location);
        }

        if let Some(new_parent) = &new_parent {
            if self
                .cycle_guard
                .would_create_cycle(&location, new_parent)
                .await?
            {
                tracing::warn!(
                    location_id = %id,
                    parent_id = %new_parent.id(),
                    "Rejected reparent: parent is the location itself or one of its descendants"
                );
                return Err(HierarchyError::CyclicParent {
                    id,
                    parent_id: new_parent.id(),
                });
            }
            location.set_parent(Some(new_parent.id()));
        }

        changes.apply_to(&mut location);

        let saved = self.store.update_location(&location).await.map_err(|e| {
            tracing::warn!(error = %e, location_id = %id, "Failed to update location");
            if e.is_not_found() {
                HierarchyError::NotFound(id)
            } else {
                HierarchyError::from(e)
            }
        })?;

        match new_parent {
            Some(parent) => {
                tracing::info!(location_id = %id, parent_id = %parent.id(), "Reparented location")
            }
            None => tracing::debug!(location_id = %id, "Updated location"),
        }
        Ok(saved)
    }

    /// Remove every descendant of `id` in one bulk operation.
    ///
    /// The location itself stays in place, only its subtree is cleared.
    pub async fn remove(&self, id: LocationId) -> Result<(), HierarchyError> {
        let _guard = self.structure_lock.lock().await;

        self.load(id).await?;

        let descendants = self
            .store
            .find_descendants(id)
            .await
            .map_err(|source| removal_failed(id, source))?;

        if descendants.is_empty() {
            tracing::debug!(location_id = %id, "No descendants to remove");
            return Ok(());
        }

        let ids: Vec<LocationId> = descendants.iter().map(Location::id).collect();
        self.store
            .remove_all(&ids)
            .await
            .map_err(|source| removal_failed(id, source))?;

        tracing::info!(location_id = %id, removed = ids.len(), "Removed location subtree");
        Ok(())
    }
}

fn removal_failed(id: LocationId, source: RepoError) -> HierarchyError {
    tracing::error!(location_id = %id, error = %source, "Error removing location subtree");
    HierarchyError::RemovalFailed { id, source }
}
