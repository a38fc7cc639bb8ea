//! Per-IP posting cooldown for the discussion board.
//!
//! DESIGN
//! ======
//! The limiter keeps no state of its own. The comment store already records
//! each post's IP and timestamp, so the check reads the IP's most recent row
//! and rejects a new post that lands inside the cooldown window.
//!
//! TRADE-OFFS
//! ==========
//! Check and insert are separate store calls, so two concurrent posts from
//! one IP can both pass. Expected load is a handful of students.

use time::{Duration, OffsetDateTime};

const DEFAULT_COOLDOWN_SECS: u64 = 5;

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Too many requests. Please wait a moment.")]
    CooldownActive { retry_after_secs: u64 },
}

// =============================================================================
// COOLDOWN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostCooldown {
    window: Duration,
}

impl PostCooldown {
    /// Cooldown from `COMMENT_COOLDOWN_SECS` (default 5).
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_secs(env_parse("COMMENT_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS))
    }

    #[must_use]
    pub fn with_secs(secs: u64) -> Self {
        Self { window: Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)) }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check a new post at `now` against the IP's previous post, if any.
    ///
    /// A previous post stamped in the future (clock skew between writers)
    /// counts as inside the window.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::CooldownActive`] when `now` is less than one
    /// window after `last_post`.
    pub fn check(&self, last_post: Option<OffsetDateTime>, now: OffsetDateTime) -> Result<(), RateLimitError> {
        let Some(last_post) = last_post else {
            return Ok(());
        };
        let elapsed = now - last_post;
        if elapsed >= self.window {
            return Ok(());
        }
        let remaining = self.window - elapsed;
        let whole = remaining.whole_seconds();
        let rounded_up = if remaining.subsec_nanoseconds() > 0 { whole + 1 } else { whole };
        Err(RateLimitError::CooldownActive { retry_after_secs: u64::try_from(rounded_up.max(1)).unwrap_or(1) })
    }
}

impl Default for PostCooldown {
    fn default() -> Self {
        Self::with_secs(DEFAULT_COOLDOWN_SECS)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
