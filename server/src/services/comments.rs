//! Discussion-board comment service.
//!
//! DESIGN
//! ======
//! Request bodies are parsed leniently: malformed JSON, or JSON that is not
//! an object, is treated as `{}` and then fails validation like any empty
//! post. Field values are coerced to text before trimming and truncation.
//!
//! ERROR HANDLING
//! ==============
//! Validation runs before any store access, so a rejected post never
//! reaches the database. Store failures surface as [`CommentError::Store`]
//! and are reported to clients as a generic server error.

use serde_json::{Map, Number, Value};
use time::OffsetDateTime;
use tracing::info;

use crate::rate_limit::{PostCooldown, RateLimitError};
use crate::store::{Comment, CommentStore, NewComment, StoreError};

pub const MAX_MESSAGE_CHARS: usize = 5000;
pub const MAX_NAME_CHARS: usize = 80;
pub const MAX_EMAIL_CHARS: usize = 120;
pub const DEFAULT_LIST_LIMIT: usize = 200;
pub const MAX_LIST_LIMIT: usize = 500;
pub const ANONYMOUS: &str = "Anonymous";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Message required")]
    MessageRequired,
    #[error("Message too long")]
    MessageTooLong,
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Raw fields of a post, coerced to text but not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub name: String,
    pub email: String,
    pub msg: String,
}

/// A post that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComment {
    pub name: String,
    pub email: Option<String>,
    pub msg: String,
}

impl CommentDraft {
    /// Parse a request body. Anything other than a JSON object yields an
    /// empty draft.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        let object = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self {
            name: field_text(&object, "name"),
            email: field_text(&object, "email"),
            msg: field_text(&object, "msg"),
        }
    }

    /// Normalize and validate the draft.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::MessageRequired`] for a blank message and
    /// [`CommentError::MessageTooLong`] for one over [`MAX_MESSAGE_CHARS`].
    pub fn validate(&self) -> Result<ValidComment, CommentError> {
        let msg = self.msg.trim();
        if msg.is_empty() {
            return Err(CommentError::MessageRequired);
        }
        if msg.chars().count() > MAX_MESSAGE_CHARS {
            return Err(CommentError::MessageTooLong);
        }

        let name = truncate_chars(self.name.trim(), MAX_NAME_CHARS);
        let email = truncate_chars(self.email.trim(), MAX_EMAIL_CHARS);

        Ok(ValidComment {
            name: if name.is_empty() { ANONYMOUS.to_owned() } else { name },
            email: (!email.is_empty()).then_some(email),
            msg: msg.to_owned(),
        })
    }
}

/// Text form of a body field. Falsy values (missing, null, false, 0, "")
/// become empty, as do arrays and objects.
fn field_text(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::Bool(true)) => "true".to_owned(),
        _ => String::new(),
    }
}

/// Whole-valued floats print without a fraction (`1.0` is "1"); zero is
/// falsy and prints nothing.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if f == 0.0 => String::new(),
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Parse the `limit` query parameter: default 200, capped at 500.
#[must_use]
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map_or(DEFAULT_LIST_LIMIT, |n| n.min(MAX_LIST_LIMIT))
}

/// Postgres keeps microseconds; trimming up front keeps the returned
/// timestamp equal to the stored one.
fn truncate_to_micros(ts: OffsetDateTime) -> OffsetDateTime {
    ts.replace_nanosecond(ts.nanosecond() / 1_000 * 1_000)
        .unwrap_or(ts)
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// List recent comments, newest first.
///
/// # Errors
///
/// Returns [`CommentError::Store`] if the store cannot be read.
pub async fn list_comments(store: &dyn CommentStore, limit: usize) -> Result<Vec<Comment>, CommentError> {
    Ok(store.recent(limit.min(MAX_LIST_LIMIT)).await?)
}

/// Store a new comment once it passes validation and the IP cooldown.
///
/// An empty `ip` skips the rate-limit check.
///
/// # Errors
///
/// Returns a validation error, [`CommentError::RateLimited`] when the IP
/// posted within the cooldown, or [`CommentError::Store`] on store failure.
pub async fn post_comment(
    store: &dyn CommentStore,
    cooldown: &PostCooldown,
    draft: &CommentDraft,
    ip: &str,
    now: OffsetDateTime,
) -> Result<Comment, CommentError> {
    let valid = draft.validate()?;
    let now = truncate_to_micros(now);

    if !ip.is_empty() {
        let last = store.last_post_at(ip).await?;
        if let Err(e) = cooldown.check(last, now) {
            info!(%ip, "comment rejected by cooldown");
            return Err(e.into());
        }
    }

    let saved = store
        .insert(NewComment {
            name: valid.name,
            email: valid.email,
            msg: valid.msg,
            ip: ip.to_owned(),
            created_at: now,
        })
        .await?;
    info!(id = %saved.id, "comment stored");
    Ok(saved)
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
