//! Character variety rules - uppercase, lowercase, digits, symbols.

use super::RuleResult;

/// Characters that count as a symbol.
pub const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

pub fn uppercase_rule(password: &str) -> RuleResult {
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("One uppercase letter".to_string());
    }
    None
}

pub fn lowercase_rule(password: &str) -> RuleResult {
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("One lowercase letter".to_string());
    }
    None
}

pub fn digit_rule(password: &str) -> RuleResult {
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("One number".to_string());
    }
    None
}

/// Only characters in [`SYMBOLS`] count; `-`, `_` and spaces do not.
pub fn symbol_rule(password: &str) -> RuleResult {
    if !password.chars().any(|c| SYMBOLS.contains(c)) {
        return Some("One special character".to_string());
    }
    None
}
