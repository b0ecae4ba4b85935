//! Live form state: values, touched fields and the current errors.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::form::{AuthForm, AuthMode, Field, LoginType, ValidationErrors};
use crate::rate_limit::{RateLimitKey, RateLimiter};
use crate::validator::{validate_field, validate_form};

/// Why [`FormSession::submit`] refused to go ahead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Form has invalid fields: {0}")]
    Invalid(ValidationErrors),
    #[error("Too many attempts, try again in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Fields the user has interacted with.
pub type TouchedFields = BTreeSet<Field>;

#[derive(Debug)]
pub struct FormSession {
    form: AuthForm,
    touched: TouchedFields,
    errors: ValidationErrors,
    subject: Option<String>,
}

impl FormSession {
    pub fn new(mode: AuthMode, login_type: LoginType) -> Self {
        Self {
            form: AuthForm::empty(mode, login_type),
            touched: TouchedFields::new(),
            errors: ValidationErrors::new(),
            subject: None,
        }
    }

    pub fn login(login_type: LoginType) -> Self {
        Self::new(AuthMode::Login, login_type)
    }

    pub fn signup(login_type: LoginType) -> Self {
        Self::new(AuthMode::Signup, login_type)
    }

    /// Counts this session's submits under `subject` instead of the shared
    /// per-action counter.
    pub fn with_rate_limit_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn form(&self) -> &AuthForm {
        &self.form
    }

    pub fn touched(&self) -> &TouchedFields {
        &self.touched
    }

    /// All current errors, touched or not.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn rate_limit_key(&self) -> RateLimitKey {
        let action = self.form.mode().action();
        match &self.subject {
            Some(subject) => RateLimitKey::for_subject(action, subject.clone()),
            None => RateLimitKey::action(action),
        }
    }

    /// Updates a field value. Touched fields are re-validated right away.
    ///
    /// Returns `false` if the form has no such field.
    pub fn set_value(&mut self, field: Field, value: &str) -> bool {
        if !self.form.set(field, value) {
            return false;
        }
        if self.touched.contains(&field) {
            self.revalidate(field);
        }
        // The confirmation depends on the password too.
        if field == Field::Password && self.touched.contains(&Field::ConfirmPassword) {
            self.revalidate(Field::ConfirmPassword);
        }
        true
    }

    /// Marks `field` as touched and validates it.
    pub fn blur(&mut self, field: Field) {
        if !self.form.fields().contains(&field) {
            return;
        }
        self.touched.insert(field);
        self.revalidate(field);
    }

    /// Switches between email and phone login, clearing the old credential.
    pub fn switch_login_type(&mut self, login_type: LoginType) {
        let old = self.form.credential().field();
        self.form.set_login_type(login_type);
        if self.form.credential().field() != old {
            self.touched.remove(&old);
            self.errors.remove(old);
        }
    }

    /// The error for `field`, if it has been touched.
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        if self.touched.contains(&field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// Errors of touched fields only.
    pub fn visible_errors(&self) -> ValidationErrors {
        let mut visible = ValidationErrors::new();
        for (field, message) in self.errors.iter() {
            if self.touched.contains(&field) {
                visible.insert(field, message);
            }
        }
        visible
    }

    /// Validates the whole form and, if it passes, records an attempt.
    ///
    /// Every field counts as touched afterwards. On success the rate limit
    /// key that was charged is returned.
    pub fn submit(&mut self, limiter: &RateLimiter) -> Result<RateLimitKey, SubmitError> {
        self.touched.extend(self.form.fields());
        self.errors = validate_form(&self.form);
        if !self.errors.is_empty() {
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        let key = self.rate_limit_key();
        let decision = limiter.check(key.clone());
        if !decision.allowed {
            return Err(SubmitError::RateLimited {
                retry_after_secs: decision.retry_after_secs.unwrap_or(1),
            });
        }
        Ok(key)
    }

    /// Call once the backend has accepted the credentials.
    ///
    /// Clears the attempt counter for this form and empties the session.
    pub fn complete(&mut self, limiter: &RateLimiter) {
        limiter.reset(self.rate_limit_key());
        self.reset();
    }

    /// Empties values, touched fields and errors, keeping mode and login type.
    pub fn reset(&mut self) {
        self.form = AuthForm::empty(self.form.mode(), self.form.login_type());
        self.touched.clear();
        self.errors = ValidationErrors::new();
    }

    fn revalidate(&mut self, field: Field) {
        match validate_field(&self.form, field) {
            Some(message) => self.errors.insert(field, message),
            None => {
                self.errors.remove(field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::RateLimitConfig;
    use std::time::Duration;

    fn filled_login() -> FormSession {
        let mut session = FormSession::login(LoginType::Email);
        session.set_value(Field::Email, "ada@example.com");
        session.set_value(Field::Password, "Abc123!@");
        session
    }

    #[test]
    fn test_untouched_errors_are_hidden() {
        let mut session = FormSession::login(LoginType::Email);
        session.set_value(Field::Email, "not-an-email");
        assert!(session.visible_errors().is_empty());

        session.blur(Field::Email);
        assert_eq!(
            session.visible_error(Field::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(session.visible_error(Field::Password), None);
    }

    #[test]
    fn test_touched_field_revalidates_on_change() {
        let mut session = FormSession::login(LoginType::Email);
        session.blur(Field::Email);
        assert_eq!(session.visible_error(Field::Email), Some("Email is required"));

        session.set_value(Field::Email, "ada@example.com");
        assert_eq!(session.visible_error(Field::Email), None);
    }

    #[test]
    fn test_password_change_rechecks_confirmation() {
        let mut session = FormSession::signup(LoginType::Email);
        session.set_value(Field::Password, "Abc123!@");
        session.set_value(Field::ConfirmPassword, "Abc123!@");
        session.blur(Field::ConfirmPassword);
        assert_eq!(session.visible_error(Field::ConfirmPassword), None);

        session.set_value(Field::Password, "Abc123!#");
        assert_eq!(
            session.visible_error(Field::ConfirmPassword),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_blur_ignores_fields_not_on_form() {
        let mut session = FormSession::login(LoginType::Email);
        session.blur(Field::Name);
        assert!(session.touched().is_empty());
        assert!(!session.set_value(Field::Phone, "5551234567"));
    }

    #[test]
    fn test_switch_login_type_drops_old_credential_state() {
        let mut session = FormSession::login(LoginType::Email);
        session.blur(Field::Email);
        assert!(session.errors().contains(Field::Email));

        session.switch_login_type(LoginType::Phone);
        assert!(!session.touched().contains(&Field::Email));
        assert!(!session.errors().contains(Field::Email));
        assert_eq!(session.form().login_type(), LoginType::Phone);
    }

    #[test]
    fn test_submit_invalid_form_touches_everything() {
        let limiter = RateLimiter::default();
        let mut session = FormSession::signup(LoginType::Phone);

        let err = session.submit(&limiter).unwrap_err();
        match err {
            SubmitError::Invalid(errors) => {
                assert_eq!(errors.len(), 4);
                assert_eq!(errors.get(Field::Phone), Some("Phone number is required"));
            }
            other => panic!("Expected Invalid, got {:?}", other),
        }
        assert_eq!(session.visible_errors().len(), 4);
        // Invalid submits are not charged.
        assert!(limiter.is_empty());
    }

    #[test]
    fn test_submit_is_rate_limited_after_five_attempts() {
        let limiter = RateLimiter::default();
        let mut session = filled_login();

        for _ in 0..5 {
            assert_eq!(session.submit(&limiter), Ok(RateLimitKey::action("login")));
        }
        match session.submit(&limiter) {
            Err(SubmitError::RateLimited { retry_after_secs }) => assert!(retry_after_secs > 0),
            other => panic!("Expected RateLimited, got {:?}", other),
        }
    }

    #[test]
    fn test_complete_resets_limit_and_session() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_attempts: 1,
            window: Duration::from_secs(60),
        });
        let mut session = filled_login();
        assert!(session.submit(&limiter).is_ok());
        assert!(session.submit(&limiter).is_err());

        session.complete(&limiter);
        assert!(session.touched().is_empty());
        assert_eq!(session.form().credential().value(), "");
        assert_eq!(session.form().login_type(), LoginType::Email);

        let mut next = filled_login();
        assert!(next.submit(&limiter).is_ok());
    }

    #[test]
    fn test_subject_scoped_sessions_do_not_share_counter() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_attempts: 1,
            window: Duration::from_secs(60),
        });
        let mut ada = filled_login().with_rate_limit_subject("ada");
        let mut bob = filled_login().with_rate_limit_subject("bob");

        assert!(ada.submit(&limiter).is_ok());
        assert!(ada.submit(&limiter).is_err());
        assert_eq!(
            bob.submit(&limiter),
            Ok(RateLimitKey::for_subject("login", "bob"))
        );
    }

    #[test]
    fn test_submit_error_messages() {
        let err = SubmitError::RateLimited { retry_after_secs: 42 };
        assert_eq!(err.to_string(), "Too many attempts, try again in 42 seconds");
    }
}
