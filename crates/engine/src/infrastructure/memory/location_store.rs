//! In-memory location store for development and testing
//!
//! Records live in a `HashMap` behind a single `RwLock`. Every write takes
//! the write lock for its whole check-then-write sequence, which makes each
//! `save` and `remove_all` atomic. Nothing is persisted across restarts.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use loctree_domain::{Location, LocationId, LocationNode};

use crate::infrastructure::ports::{
    LocationStore, RepoError, LOCATION_NAME_FIELD, LOCATION_NUMBER_FIELD,
};

/// In-memory location store
#[derive(Default, Clone)]
pub struct InMemoryLocationStore {
    locations: Arc<RwLock<HashMap<LocationId, Location>>>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored locations.
    pub async fn len(&self) -> usize {
        self.locations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.locations.read().await.is_empty()
    }
}

fn children_index(locations: &HashMap<LocationId, Location>) -> HashMap<LocationId, Vec<LocationId>> {
    let mut index: HashMap<LocationId, Vec<LocationId>> = HashMap::new();
    for location in locations.values() {
        if let Some(parent_id) = location.parent_id() {
            index.entry(parent_id).or_default().push(location.id());
        }
    }
    index
}

fn check_unique(
    locations: &HashMap<LocationId, Location>,
    location: &Location,
) -> Result<(), RepoError> {
    for other in locations.values().filter(|l| l.id() != location.id()) {
        if other.location_name() == location.location_name() {
            return Err(RepoError::duplicate(Some(LOCATION_NAME_FIELD)));
        }
        if other.location_number() == location.location_number() {
            return Err(RepoError::duplicate(Some(LOCATION_NUMBER_FIELD)));
        }
    }
    Ok(())
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, RepoError> {
        Ok(self.locations.read().await.get(&id).cloned())
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<Location>, RepoError> {
        let locations = self.locations.read().await;
        Ok(locations
            .values()
            .find(|l| l.location_number().as_str() == number)
            .cloned())
    }

    async fn find_roots(&self) -> Result<Vec<LocationNode>, RepoError> {
        let snapshot: Vec<Location> = self.locations.read().await.values().cloned().collect();
        Ok(LocationNode::forest(snapshot))
    }

    async fn find_children(&self, id: LocationId) -> Result<Vec<Location>, RepoError> {
        let locations = self.locations.read().await;
        Ok(locations
            .values()
            .filter(|l| l.parent_id() == Some(id))
            .cloned()
            .collect())
    }

    async fn find_descendants(&self, id: LocationId) -> Result<Vec<Location>, RepoError> {
        let locations = self.locations.read().await;
        let index = children_index(&locations);

        let mut seen: HashSet<LocationId> = HashSet::from([id]);
        let mut queue: VecDeque<LocationId> = VecDeque::from([id]);
        let mut descendants = Vec::new();

        while let Some(current) = queue.pop_front() {
            for child_id in index.get(&current).into_iter().flatten() {
                if !seen.insert(*child_id) {
                    continue;
                }
                if let Some(child) = locations.get(child_id) {
                    descendants.push(child.clone());
                }
                queue.push_back(*child_id);
            }
        }

        Ok(descendants)
    }

    async fn find_ancestors(&self, id: LocationId) -> Result<Vec<Location>, RepoError> {
        let locations = self.locations.read().await;
        let mut ancestors = Vec::new();
        let mut next = locations.get(&id).and_then(Location::parent_id);

        // A well-formed chain is never longer than the store.
        while let Some(parent_id) = next {
            if parent_id == id || ancestors.len() >= locations.len() {
                break;
            }
            let Some(parent) = locations.get(&parent_id) else {
                break;
            };
            next = parent.parent_id();
            ancestors.push(parent.clone());
        }

        Ok(ancestors)
    }

    async fn save(&self, location: &Location) -> Result<Location, RepoError> {
        let mut locations = self.locations.write().await;
        check_unique(&locations, location)?;

        locations.insert(location.id(), location.clone());
        Ok(location.clone())
    }

    async fn update_location(&self, location: &Location) -> Result<Location, RepoError> {
        let mut locations = self.locations.write().await;
        if !locations.contains_key(&location.id()) {
            return Err(RepoError::not_found("Location", location.id()));
        }
        check_unique(&locations, location)?;

        locations.insert(location.id(), location.clone());
        Ok(location.clone())
    }

    async fn remove_all(&self, ids: &[LocationId]) -> Result<(), RepoError> {
        let mut locations = self.locations.write().await;

        if let Some(missing) = ids.iter().find(|id| !locations.contains_key(*id)) {
            return Err(RepoError::not_found("Location", missing));
        }

        for id in ids {
            locations.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::location;

    async fn seeded() -> (InMemoryLocationStore, Location, Location, Location) {
        let store = InMemoryLocationStore::new();
        let a = location("A");
        let b = location("A-1").with_parent(Some(a.id()));
        let c = location("A-1-1").with_parent(Some(b.id()));
        for l in [&a, &b, &c] {
            store.save(l).await.unwrap();
        }
        (store, a, b, c)
    }

    #[tokio::test]
    async fn save_then_lookup_by_id_and_number() {
        let (store, a, _, c) = seeded().await;

        assert_eq!(store.get_location(a.id()).await.unwrap(), Some(a));
        assert_eq!(store.find_by_number("A-1-1").await.unwrap(), Some(c));
        assert_eq!(store.find_by_number("Z").await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_rejects_duplicate_name_without_writing() {
        let (store, a, _, _) = seeded().await;
        let mut clash = location("Z");
        clash.set_location_name(a.location_name().clone());

        let err = store.save(&clash).await.unwrap_err();

        assert!(matches!(
            err,
            RepoError::DuplicateKey {
                field: Some(LOCATION_NAME_FIELD)
            }
        ));
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn save_rejects_duplicate_number() {
        let (store, _, _, _) = seeded().await;
        let mut clash = location("A-1");
        clash.set_location_name(loctree_domain::LocationName::new("Other").unwrap());

        let err = store.save(&clash).await.unwrap_err();

        assert!(matches!(
            err,
            RepoError::DuplicateKey {
                field: Some(LOCATION_NUMBER_FIELD)
            }
        ));
    }

    #[tokio::test]
    async fn saving_an_existing_record_updates_in_place() {
        let (store, _, mut b, _) = seeded().await;
        b.set_area(loctree_domain::Area::new(99.0).unwrap());

        store.save(&b).await.unwrap();

        assert_eq!(store.len().await, 3);
        assert_eq!(
            store.get_location(b.id()).await.unwrap().map(|l| l.area().value()),
            Some(99.0)
        );
    }

    #[tokio::test]
    async fn update_never_resurrects_a_removed_record() {
        let (store, _, b, mut c) = seeded().await;
        store.remove_all(&[b.id(), c.id()]).await.unwrap();

        c.set_area(loctree_domain::Area::new(5.0).unwrap());
        let err = store.update_location(&c).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_checks_uniqueness() {
        let (store, a, mut b, _) = seeded().await;
        b.set_location_number(a.location_number().clone());

        let err = store.update_location(&b).await.unwrap_err();

        assert!(matches!(
            err,
            RepoError::DuplicateKey {
                field: Some(LOCATION_NUMBER_FIELD)
            }
        ));
        assert_eq!(
            store.find_by_number("A-1").await.unwrap().map(|l| l.id()),
            Some(b.id())
        );
    }

    #[tokio::test]
    async fn descendants_exclude_the_node_itself() {
        let (store, a, b, c) = seeded().await;

        let mut ids: Vec<LocationId> = store
            .find_descendants(a.id())
            .await
            .unwrap()
            .iter()
            .map(Location::id)
            .collect();
        ids.sort();
        let mut expected = vec![b.id(), c.id()];
        expected.sort();

        assert_eq!(ids, expected);
        assert!(store.find_descendants(c.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ancestors_are_nearest_first() {
        let (store, a, b, c) = seeded().await;

        let ancestors = store.find_ancestors(c.id()).await.unwrap();

        assert_eq!(ancestors, vec![b, a.clone()]);
        assert!(store.find_ancestors(a.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reads_see_the_latest_parent_pointer() {
        let (store, a, b, mut c) = seeded().await;

        c.set_parent(Some(a.id()));
        store.save(&c).await.unwrap();

        assert!(store.find_descendants(b.id()).await.unwrap().is_empty());
        assert_eq!(store.find_children(a.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn roots_carry_full_subtrees() {
        let (store, a, _, c) = seeded().await;
        store.save(&location("B")).await.unwrap();

        let roots = store.find_roots().await.unwrap();

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].location.id(), a.id());
        assert!(roots[0].find(c.id()).is_some());
    }

    #[tokio::test]
    async fn remove_all_is_all_or_nothing() {
        let (store, _, b, c) = seeded().await;

        let err = store
            .remove_all(&[b.id(), LocationId::new()])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.len().await, 3);

        store.remove_all(&[b.id(), c.id()]).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
