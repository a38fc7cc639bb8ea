//! Postgres-backed comment store.

use time::OffsetDateTime;
use uuid::Uuid;

use super::{Comment, CommentStore, NewComment, StoreError};
use crate::config::ServerConfig;
use crate::db::LazyPool;

type CommentRow = (Uuid, String, Option<String>, String, OffsetDateTime);

pub struct PgCommentStore {
    pool: LazyPool,
    relation: String,
}

impl PgCommentStore {
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self { pool: LazyPool::new(config), relation: config.comments_relation() }
    }
}

fn to_comment((id, name, email, msg, created_at): CommentRow) -> Comment {
    Comment { id, name, email, msg, created_at }
}

#[async_trait::async_trait]
impl CommentStore for PgCommentStore {
    async fn recent(&self, limit: usize) -> Result<Vec<Comment>, StoreError> {
        let pool = self.pool.get().await?;
        let sql = format!(
            "SELECT id, name, email, msg, created_at FROM {} ORDER BY created_at DESC LIMIT $1",
            self.relation
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(to_comment).collect())
    }

    async fn last_post_at(&self, ip: &str) -> Result<Option<OffsetDateTime>, StoreError> {
        let pool = self.pool.get().await?;
        let sql = format!(
            "SELECT created_at FROM {} WHERE ip = $1 ORDER BY created_at DESC LIMIT 1",
            self.relation
        );
        let last = sqlx::query_scalar::<_, OffsetDateTime>(&sql)
            .bind(ip)
            .fetch_optional(pool)
            .await?;
        Ok(last)
    }

    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let pool = self.pool.get().await?;
        let id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO {} (id, name, email, msg, created_at, ip) VALUES ($1, $2, $3, $4, $5, $6)",
            self.relation
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(&comment.name)
            .bind(&comment.email)
            .bind(&comment.msg)
            .bind(comment.created_at)
            .bind(&comment.ip)
            .execute(pool)
            .await?;

        Ok(Comment {
            id,
            name: comment.name,
            email: comment.email,
            msg: comment.msg,
            created_at: comment.created_at,
        })
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
