//! In-memory attempt limiter for the login and signup forms.
//!
//! This is a fixed-window counter: the first attempt opens a window, the
//! next `max_attempts - 1` attempts in it are allowed and the rest are denied
//! until the window ends. It only drives UX feedback. The backend owns the
//! real limit.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_WINDOW_SECS: u64 = 15 * 60;
/// Longest accepted window (one year). Longer windows are clamped to it.
pub const MAX_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

pub const MAX_ATTEMPTS_ENV: &str = "AUTH_GUARD_RATE_LIMIT_MAX_ATTEMPTS";
pub const WINDOW_SECS_ENV: &str = "AUTH_GUARD_RATE_LIMIT_WINDOW_SECS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} (expected a positive integer in range)")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_attempts: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
        }
    }
}

impl RateLimitConfig {
    /// Reads the limits from the environment.
    ///
    /// Unset variables keep their defaults (5 attempts per 15 minutes).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but is not a
    /// positive integer, or if the window exceeds [`MAX_WINDOW_SECS`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(max) = read_positive(MAX_ATTEMPTS_ENV)? {
            config.max_attempts = u32::try_from(max).map_err(|_| ConfigError::Invalid {
                var: MAX_ATTEMPTS_ENV,
                value: max.to_string(),
            })?;
        }
        if let Some(secs) = read_positive(WINDOW_SECS_ENV)? {
            if secs > MAX_WINDOW_SECS {
                return Err(ConfigError::Invalid {
                    var: WINDOW_SECS_ENV,
                    value: secs.to_string(),
                });
            }
            config.window = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn read_positive(var: &'static str) -> Result<Option<u64>, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::Invalid { var, value: raw }),
    }
}

/// What an attempt counter is keyed by.
///
/// A bare action (`"login"`) is shared by everyone using this limiter.
/// Use [`RateLimitKey::for_subject`] to count per account or session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    pub action: String,
    pub subject: Option<String>,
}

impl RateLimitKey {
    pub fn action(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            subject: None,
        }
    }

    pub fn for_subject(action: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            subject: Some(subject.into()),
        }
    }
}

impl From<&str> for RateLimitKey {
    fn from(action: &str) -> Self {
        Self::action(action)
    }
}

impl From<String> for RateLimitKey {
    fn from(action: String) -> Self {
        Self::action(action)
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "{}:{}", self.action, subject),
            None => f.write_str(&self.action),
        }
    }
}

/// Outcome of [`RateLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Whole seconds until the window ends. Only set when denied.
    pub retry_after_secs: Option<u64>,
}

impl RateLimitDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            retry_after_secs: None,
        }
    }

    fn deny(retry_after_secs: u64) -> Self {
        Self {
            allowed: false,
            retry_after_secs: Some(retry_after_secs),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u32,
    reset_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.reset_at
    }
}

/// Owned attempt store. Share it by reference or wrap it in an `Arc`.
#[derive(Debug, Default)]
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: Mutex<HashMap<RateLimitKey, Entry>>,
}

impl RateLimiter {
    /// Creates a limiter. A window longer than [`MAX_WINDOW_SECS`] is clamped.
    pub fn new(mut config: RateLimitConfig) -> Self {
        config.window = config.window.min(Duration::from_secs(MAX_WINDOW_SECS));
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<RateLimitKey, Entry>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records an attempt for `key` and says whether it may proceed.
    pub fn check(&self, key: impl Into<RateLimitKey>) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading.
    pub fn check_at(&self, key: impl Into<RateLimitKey>, now: Instant) -> RateLimitDecision {
        let key = key.into();
        let mut entries = self.entries();

        if let Some(entry) = entries.get_mut(&key).filter(|e| !e.is_expired(now)) {
            if entry.count >= self.config.max_attempts {
                let retry_after = ceil_secs(entry.reset_at.saturating_duration_since(now));
                #[cfg(feature = "tracing")]
                tracing::warn!(key = %key, retry_after, "attempt rate limited");
                return RateLimitDecision::deny(retry_after);
            }
            entry.count += 1;
            return RateLimitDecision::allow();
        }

        // First attempt, or the previous window has ended.
        let Some(reset_at) = now.checked_add(self.config.window) else {
            #[cfg(feature = "tracing")]
            tracing::error!(key = %key, "rate limit window overflows the clock, attempt not tracked");
            return RateLimitDecision::allow();
        };
        entries.insert(key, Entry { count: 1, reset_at });
        RateLimitDecision::allow()
    }

    /// Forgets all attempts for `key`, e.g. after a successful login.
    pub fn reset(&self, key: impl Into<RateLimitKey>) {
        let key = key.into();
        let _removed = self.entries().remove(&key);
        #[cfg(feature = "tracing")]
        {
            if _removed.is_some() {
                tracing::debug!(key = %key, "rate limit reset");
            }
        }
    }

    /// Attempts still allowed for `key` in its current window.
    pub fn remaining_attempts(&self, key: impl Into<RateLimitKey>) -> u32 {
        self.remaining_attempts_at(key, Instant::now())
    }

    pub fn remaining_attempts_at(&self, key: impl Into<RateLimitKey>, now: Instant) -> u32 {
        let key = key.into();
        let used = self
            .entries()
            .get(&key)
            .filter(|entry| !entry.is_expired(now))
            .map_or(0, |entry| entry.count);
        self.config.max_attempts.saturating_sub(used)
    }

    /// Drops entries whose window has ended and returns how many went.
    ///
    /// Nothing calls this automatically; callers that see many distinct keys
    /// should run it periodically.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before - entries.len();
        #[cfg(feature = "tracing")]
        tracing::debug!(purged, remaining = entries.len(), "purged expired rate limit entries");
        purged
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    secs.max(1)
}
