//! In-process comment store for tests and database-less local runs.

use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Comment, CommentStore, NewComment, StoreError};

struct Row {
    comment: Comment,
    ip: String,
}

#[derive(Default)]
pub struct MemoryCommentStore {
    rows: RwLock<Vec<Row>>,
}

impl MemoryCommentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryCommentStore {
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// IPs recorded for stored rows, oldest first.
    pub async fn recorded_ips(&self) -> Vec<String> {
        self.rows.read().await.iter().map(|r| r.ip.clone()).collect()
    }
}

#[async_trait::async_trait]
impl CommentStore for MemoryCommentStore {
    async fn recent(&self, limit: usize) -> Result<Vec<Comment>, StoreError> {
        let rows = self.rows.read().await;
        // Reverse first so equal timestamps still list the later insert first.
        let mut comments: Vec<Comment> = rows.iter().rev().map(|r| r.comment.clone()).collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments.truncate(limit);
        Ok(comments)
    }

    async fn last_post_at(&self, ip: &str) -> Result<Option<OffsetDateTime>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| r.ip == ip)
            .map(|r| r.comment.created_at)
            .max())
    }

    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let stored = Comment {
            id: Uuid::new_v4(),
            name: comment.name,
            email: comment.email,
            msg: comment.msg,
            created_at: comment.created_at,
        };
        self.rows
            .write()
            .await
            .push(Row { comment: stored.clone(), ip: comment.ip });
        Ok(stored)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
