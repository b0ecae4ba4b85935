//! Form validator - per-field rules for the login and signup forms.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use crate::form::{AuthForm, Credential, Field, ValidationErrors};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 50;

const PHONE_DIGITS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Validates every field of `form`.
///
/// Fields that pass are left out of the result, so an empty
/// [`ValidationErrors`] means the form can be submitted.
pub fn validate_form(form: &AuthForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in form.fields() {
        if let Some(message) = validate_field(form, field) {
            errors.insert(field, message);
        }
    }
    errors
}

/// Validates a single field, as done on blur.
///
/// Returns `None` for valid fields and for fields the form does not have.
pub fn validate_field(form: &AuthForm, field: Field) -> Option<String> {
    match (form, field) {
        (_, Field::Email | Field::Phone) => match form.credential() {
            Credential::Email(email) if field == Field::Email => check_email(email),
            Credential::Phone(phone) if field == Field::Phone => check_phone(phone),
            _ => None,
        },
        (_, Field::Password) => check_password(form.password()),
        (AuthForm::Signup(f), Field::ConfirmPassword) => {
            check_confirm_password(&f.password, &f.confirm_password)
        }
        (AuthForm::Signup(f), Field::Name) => check_name(&f.name),
        _ => None,
    }
}

fn check_email(email: &str) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    if !EMAIL_RE.is_match(email) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

fn check_phone(phone: &str) -> Option<String> {
    if phone.trim().is_empty() {
        return Some("Phone number is required".to_string());
    }
    if normalize_phone(phone).is_none() {
        return Some("Please enter a valid phone number".to_string());
    }
    None
}

fn check_password(password: &SecretString) -> Option<String> {
    let pwd = password.expose_secret();
    if pwd.is_empty() {
        return Some("Password is required".to_string());
    }
    // Composition rules only feed the strength meter.
    if pwd.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    None
}

fn check_confirm_password(password: &SecretString, confirm: &SecretString) -> Option<String> {
    let confirm = confirm.expose_secret();
    if confirm.is_empty() {
        return Some("Please confirm your password".to_string());
    }
    if confirm != password.expose_secret() {
        return Some("Passwords do not match".to_string());
    }
    None
}

fn check_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return Some("Name is required".to_string());
    }
    let len = name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Some(format!(
            "Name must be between {} and {} characters",
            MIN_NAME_LENGTH, MAX_NAME_LENGTH
        ));
    }
    None
}

fn phone_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strips everything but digits and formats the result as `(XXX) XXX-XXXX`.
///
/// Returns `None` unless exactly ten digits remain.
pub fn normalize_phone(input: &str) -> Option<String> {
    let digits = phone_digits(input);
    if digits.len() != PHONE_DIGITS {
        return None;
    }
    Some(format!(
        "({}) {}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..]
    ))
}

/// Formats a partially typed phone number, e.g. `(555) 12`.
///
/// Digits past the tenth are dropped.
pub fn format_phone_input(input: &str) -> String {
    let digits: String = phone_digits(input).chars().take(PHONE_DIGITS).collect();
    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({}", digits),
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}
