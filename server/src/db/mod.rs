//! Lazily created Postgres pool for the comment store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The pool is created on the first comment request rather than at startup,
//! then reused for the life of the process. A failed connect is not cached,
//! so the next request tries again. The pool health-checks each connection
//! before handing it out, which covers a database that went away between
//! requests.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::ServerConfig;
use crate::store::StoreError;

pub struct LazyPool {
    database_url: Option<String>,
    max_connections: u32,
    schema: String,
    table: String,
    pool: OnceCell<PgPool>,
}

impl LazyPool {
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            database_url: config.database_url.clone(),
            max_connections: config.db_max_connections,
            schema: config.comments_schema.clone(),
            table: config.comments_table.clone(),
            pool: OnceCell::new(),
        }
    }

    /// Return the shared pool, connecting and preparing the schema on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingDatabaseUrl`] when no URL is configured, or
    /// a database error if connecting or creating the table fails.
    pub async fn get(&self) -> Result<&PgPool, StoreError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(StoreError::MissingDatabaseUrl)?;
        self.pool
            .get_or_try_init(|| async {
                let pool = PgPoolOptions::new()
                    .max_connections(self.max_connections)
                    .test_before_acquire(true)
                    .connect(url)
                    .await?;
                ensure_schema(&pool, &self.schema, &self.table).await?;
                info!(schema = %self.schema, table = %self.table, "comment store connected");
                Ok::<PgPool, StoreError>(pool)
            })
            .await
    }
}

/// Create the schema, table, and lookup indexes if they do not exist.
///
/// `schema` and `table` must already be validated identifiers.
async fn ensure_schema(pool: &PgPool, schema: &str, table: &str) -> Result<(), sqlx::Error> {
    let statements = [
        format!("CREATE SCHEMA IF NOT EXISTS {schema}"),
        format!(
            "CREATE TABLE IF NOT EXISTS {schema}.{table} (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT,
                msg TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                ip TEXT NOT NULL DEFAULT ''
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS {table}_ip_created_at_idx ON {schema}.{table} (ip, created_at DESC)"),
        format!("CREATE INDEX IF NOT EXISTS {table}_created_at_idx ON {schema}.{table} (created_at DESC)"),
    ];
    for sql in &statements {
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}
