//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The course dataset is loaded once at startup and shared read-only. The
//! comment store is a trait object so tests can swap in the in-memory
//! backend without a database.

use std::sync::Arc;

use course::{Dataset, GradePolicy};

use crate::rate_limit::PostCooldown;
use crate::store::CommentStore;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; every field is
/// either `Arc`-wrapped or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub comments: Arc<dyn CommentStore>,
    pub cooldown: PostCooldown,
    pub policy: GradePolicy,
}

impl AppState {
    #[must_use]
    pub fn new(dataset: Dataset, comments: Arc<dyn CommentStore>, cooldown: PostCooldown) -> Self {
        Self { dataset: Arc::new(dataset), comments, cooldown, policy: GradePolicy::default() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_state_starts_without_comments() {
        let (state, store) = test_helpers::test_app_state();
        assert_eq!(state.dataset.students.len(), 4);
        assert!(store.is_empty().await);
        assert_eq!(state.policy, GradePolicy::default());
        assert_eq!(state.cooldown, PostCooldown::default());
    }
}
