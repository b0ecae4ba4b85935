//! Client-side helpers for login and signup forms
//!
//! This library validates auth forms, throttles repeated submits and scores
//! password strength for UI feedback. The backend stays the authority for
//! credentials and for real rate limiting.
//!
//! # Features
//!
//! - `async` (default): Enables debounced and remote strength checks
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `AUTH_GUARD_BLACKLIST_PATH`: Custom path to the common-password list
//!   (default: `./assets/blacklist.txt`)
//! - `AUTH_GUARD_RATE_LIMIT_MAX_ATTEMPTS`: Attempts per window (default: 5)
//! - `AUTH_GUARD_RATE_LIMIT_WINDOW_SECS`: Window length (default: 900)
//!
//! # Example
//!
//! ```rust
//! use auth_guard::{score_password, Field, FormSession, LoginType, RateLimiter};
//! use secrecy::SecretString;
//!
//! let limiter = RateLimiter::default();
//! let mut session = FormSession::login(LoginType::Email);
//! session.set_value(Field::Email, "ada@example.com");
//! session.set_value(Field::Password, "Abc123!@");
//!
//! let key = session.submit(&limiter).expect("form is valid");
//! assert_eq!(key.action, "login");
//!
//! let password = SecretString::new("Abc123!@".to_string().into());
//! let strength = score_password(&password);
//! assert_eq!(strength.score, 5);
//! assert!(strength.is_valid);
//! ```

mod blacklist;
#[cfg(feature = "async")]
mod debounce;
mod form;
mod rate_limit;
mod rules;
mod session;
mod strength;
mod validator;

// Public API
pub use blacklist::{blacklist_path, Blacklist, BlacklistError, BLACKLIST_PATH_ENV};
pub use form::{
    AuthForm, AuthMode, Credential, Field, LoginFields, LoginType, SignupFields,
    ValidationErrors,
};
pub use rate_limit::{
    ConfigError, RateLimitConfig, RateLimitDecision, RateLimitKey, RateLimiter,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_SECS, MAX_ATTEMPTS_ENV, MAX_WINDOW_SECS, WINDOW_SECS_ENV,
};
pub use rules::SYMBOLS;
pub use session::{FormSession, SubmitError, TouchedFields};
pub use strength::{
    score_password, PasswordScorer, PasswordStrength, PasswordStrengthResult, MAX_SCORE,
};
pub use validator::{
    format_phone_input, normalize_phone, validate_field, validate_form, MAX_NAME_LENGTH,
    MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};

#[cfg(feature = "async")]
pub use debounce::{StrengthDebouncer, DEFAULT_DEBOUNCE};
#[cfg(feature = "async")]
pub use strength::score_password_remote;
