//! Server configuration parsed from environment variables.
//!
//! Required for the Postgres store:
//! - `DATABASE_URL`: connection string. Its absence is not fatal at startup;
//!   each comment request fails with a server error instead.
//!
//! Optional:
//! - `PORT`: default 3000
//! - `COMMENTS_STORE`: `postgres` (default) or `memory`
//! - `COMMENTS_DB`: schema holding the comments table, default `course_site`
//! - `COMMENTS_COLLECTION`: comments table name, default `discussion`
//! - `ALLOWED_ORIGIN`: CORS origin, default `*`
//! - `DB_MAX_CONNECTIONS`: default 5
//! - `COURSE_DATA_PATH`: dataset JSON, default the bundled sample
//! - `COURSE_OVERRIDES_PATH`: override JSON merged over the dataset

use std::path::PathBuf;

use axum::http::HeaderValue;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_COMMENTS_SCHEMA: &str = "course_site";
pub const DEFAULT_COMMENTS_TABLE: &str = "discussion";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} (expected a SQL identifier)")]
    InvalidIdentifier { var: &'static str, value: String },
    #[error("unknown COMMENTS_STORE: {0} (expected 'postgres' or 'memory')")]
    UnknownStore(String),
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid ALLOWED_ORIGIN: {0:?}")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigin {
    Any,
    Exact(HeaderValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub comments_schema: String,
    pub comments_table: String,
    pub db_max_connections: u32,
    pub allowed_origin: AllowedOrigin,
    pub course_data_path: Option<PathBuf>,
    pub course_overrides_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Build config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let store = parse_store(var("COMMENTS_STORE").as_deref())?;
        let comments_schema = identifier("COMMENTS_DB", var("COMMENTS_DB"), DEFAULT_COMMENTS_SCHEMA)?;
        let comments_table = identifier("COMMENTS_COLLECTION", var("COMMENTS_COLLECTION"), DEFAULT_COMMENTS_TABLE)?;
        let db_max_connections = var("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let allowed_origin = parse_origin(var("ALLOWED_ORIGIN").as_deref())?;

        Ok(Self {
            port,
            store,
            database_url: var("DATABASE_URL"),
            comments_schema,
            comments_table,
            db_max_connections,
            allowed_origin,
            course_data_path: var("COURSE_DATA_PATH").map(PathBuf::from),
            course_overrides_path: var("COURSE_OVERRIDES_PATH").map(PathBuf::from),
        })
    }

    /// Schema-qualified comments table, safe to interpolate into SQL.
    #[must_use]
    pub fn comments_relation(&self) -> String {
        format!("{}.{}", self.comments_schema, self.comments_table)
    }
}

fn parse_store(raw: Option<&str>) -> Result<StoreKind, ConfigError> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        None | Some("postgres") => Ok(StoreKind::Postgres),
        Some("memory") => Ok(StoreKind::Memory),
        Some(other) => Err(ConfigError::UnknownStore(other.to_owned())),
    }
}

fn parse_origin(raw: Option<&str>) -> Result<AllowedOrigin, ConfigError> {
    match raw {
        None | Some("*") => Ok(AllowedOrigin::Any),
        Some(origin) => HeaderValue::from_str(origin)
            .map(AllowedOrigin::Exact)
            .map_err(|_| ConfigError::InvalidOrigin(origin.to_owned())),
    }
}

/// Table and schema names are interpolated into DDL and queries, so only
/// plain identifiers are accepted.
fn identifier(var: &'static str, raw: Option<String>, default: &str) -> Result<String, ConfigError> {
    let Some(value) = raw else {
        return Ok(default.to_owned());
    };
    let mut chars = value.chars();
    let valid_head = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid_head && valid_tail && value.len() <= 63 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidIdentifier { var, value })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
