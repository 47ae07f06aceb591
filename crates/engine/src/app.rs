//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::LocationStore;
use crate::use_cases::HierarchyService;

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub hierarchy: HierarchyService,
}

impl App {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self {
            hierarchy: HierarchyService::new(store),
        }
    }
}
