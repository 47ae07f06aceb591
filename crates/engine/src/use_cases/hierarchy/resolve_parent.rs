//! Parent resolution - explicit reference first, structured number second.

use std::sync::Arc;

use loctree_domain::{Location, LocationId};

use super::HierarchyError;
use crate::infrastructure::ports::LocationStore;

/// Separator between the segments of a location number.
pub const NUMBER_DELIMITER: char = '-';

/// The conventional parent number of `number`: everything before the last
/// delimiter. `None` for single-segment numbers.
///
/// ```
/// use loctree_engine::use_cases::hierarchy::parent_number;
///
/// assert_eq!(parent_number("BLD1-2-101"), Some("BLD1-2"));
/// assert_eq!(parent_number("BLD1"), None);
/// ```
pub fn parent_number(number: &str) -> Option<&str> {
    number
        .rfind(NUMBER_DELIMITER)
        .map(|idx| &number[..idx])
        .filter(|prefix| !prefix.is_empty())
}

/// Determines the true parent of a record.
pub struct HierarchyResolver {
    store: Arc<dyn LocationStore>,
}

impl HierarchyResolver {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self { store }
    }

    /// Resolve the parent for a record numbered `number`.
    ///
    /// An explicit id must exist, otherwise `ParentNotFound`. Without one,
    /// the parent is looked up by the number prefix; a missing row there is
    /// not an error, the prefix may name an abstract grouping.
    pub async fn resolve_parent(
        &self,
        explicit_parent_id: Option<LocationId>,
        number: &str,
    ) -> Result<Option<Location>, HierarchyError> {
        if let Some(parent_id) = explicit_parent_id {
            return match self.store.get_location(parent_id).await? {
                Some(parent) => Ok(Some(parent)),
                None => {
                    tracing::warn!(parent_id = %parent_id, "Explicit parent location not found");
                    Err(HierarchyError::ParentNotFound(parent_id))
                }
            };
        }

        let Some(prefix) = parent_number(number) else {
            return Ok(None);
        };

        let parent = self.store.find_by_number(prefix).await?;
        if parent.is_none() {
            tracing::debug!(number, prefix, "No persisted location for inferred parent number");
        }
        Ok(parent)
    }
}
