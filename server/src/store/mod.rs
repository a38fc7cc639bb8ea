//! Comment persistence.
//!
//! ARCHITECTURE
//! ============
//! Services talk to storage through the [`CommentStore`] trait. Production
//! uses [`postgres::PgCommentStore`]; tests and local runs without a database
//! use [`memory::MemoryCommentStore`]. A stored row keeps the poster's IP for
//! rate limiting, but [`Comment`] has no IP field, so nothing read back
//! through the trait can leak it.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::{ServerConfig, StoreKind};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("DATABASE_URL is not configured")]
    MissingDatabaseUrl,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A comment as returned to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub msg: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated comment about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub name: String,
    pub email: Option<String>,
    pub msg: String,
    pub ip: String,
    pub created_at: OffsetDateTime,
}

#[async_trait::async_trait]
pub trait CommentStore: Send + Sync {
    /// Most recent comments, newest first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend is unreachable or misconfigured.
    async fn recent(&self, limit: usize) -> Result<Vec<Comment>, StoreError>;

    /// Creation time of the newest comment posted from `ip`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend is unreachable or misconfigured.
    async fn last_post_at(&self, ip: &str) -> Result<Option<OffsetDateTime>, StoreError>;

    /// Persist a comment and return its public form.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend is unreachable or misconfigured.
    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError>;
}

/// Build the store selected by `COMMENTS_STORE`.
#[must_use]
pub fn from_config(config: &ServerConfig) -> Arc<dyn CommentStore> {
    match config.store {
        StoreKind::Postgres => Arc::new(postgres::PgCommentStore::new(config)),
        StoreKind::Memory => Arc::new(memory::MemoryCommentStore::new()),
    }
}
