//! Cycle prevention for parent reassignment.

use std::sync::Arc;

use loctree_domain::Location;

use crate::infrastructure::ports::{LocationStore, RepoError};

/// Rejects a candidate parent that is the node itself or one of its
/// descendants.
pub struct CycleGuard {
    store: Arc<dyn LocationStore>,
}

impl CycleGuard {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self { store }
    }

    /// True iff making `candidate_parent` the parent of `node` would close a
    /// cycle. Evaluated against the descendant set as currently persisted,
    /// so call it before the reassignment is saved.
    pub async fn would_create_cycle(
        &self,
        node: &Location,
        candidate_parent: &Location,
    ) -> Result<bool, RepoError> {
        if candidate_parent.id() == node.id() {
            return Ok(true);
        }

        let descendants = self.store.find_descendants(node.id()).await?;
        Ok(descendants.iter().any(|d| d.id() == candidate_parent.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockLocationStore;
    use crate::test_fixtures::location;
    use mockall::predicate::*;

    #[tokio::test]
    async fn self_parenting_is_a_cycle_without_a_lookup() {
        let mut store = MockLocationStore::new();
        store.expect_find_descendants().never();
        let node = location("A");

        let guard = CycleGuard::new(Arc::new(store));

        assert!(guard.would_create_cycle(&node, &node).await.unwrap());
    }

    #[tokio::test]
    async fn descendant_parent_is_a_cycle() {
        let a = location("A");
        let b = location("A-1").with_parent(Some(a.id()));
        let c = location("A-1-1").with_parent(Some(b.id()));
        let subtree = vec![b.clone(), c.clone()];

        let mut store = MockLocationStore::new();
        store
            .expect_find_descendants()
            .with(eq(a.id()))
            .returning(move |_| Ok(subtree.clone()));

        let guard = CycleGuard::new(Arc::new(store));

        assert!(guard.would_create_cycle(&a, &c).await.unwrap());
    }

    #[tokio::test]
    async fn unrelated_parent_is_fine() {
        let a = location("A");
        let other = location("B");

        let mut store = MockLocationStore::new();
        store.expect_find_descendants().returning(|_| Ok(vec![]));

        let guard = CycleGuard::new(Arc::new(store));

        assert!(!guard.would_create_cycle(&a, &other).await.unwrap());
    }

    #[tokio::test]
    async fn lookup_failures_propagate() {
        let mut store = MockLocationStore::new();
        store
            .expect_find_descendants()
            .returning(|_| Err(RepoError::database("find_descendants", "connection reset")));

        let guard = CycleGuard::new(Arc::new(store));
        let result = guard
            .would_create_cycle(&location("A"), &location("B"))
            .await;

        assert!(result.is_err());
    }
}
