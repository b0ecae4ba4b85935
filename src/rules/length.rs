//! Length rule - checks password minimum length.

use crate::validator::MIN_PASSWORD_LENGTH;
use super::RuleResult;

/// Passes when the password has at least [`MIN_PASSWORD_LENGTH`] characters.
pub fn length_rule(password: &str) -> RuleResult {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(format!("At least {} characters", MIN_PASSWORD_LENGTH));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_rule_too_short() {
        assert_eq!(length_rule("Short1!"), Some("At least 8 characters".to_string()));
    }

    #[test]
    fn test_length_rule_exactly_minimum() {
        assert_eq!(length_rule("12345678"), None);
    }

    #[test]
    fn test_length_rule_matches_form_minimum() {
        let just_short = "x".repeat(MIN_PASSWORD_LENGTH - 1);
        let just_long_enough = "x".repeat(MIN_PASSWORD_LENGTH);
        assert!(length_rule(&just_short).is_some());
        assert_eq!(length_rule(&just_long_enough), None);
    }

    #[test]
    fn test_length_rule_counts_characters_not_bytes() {
        // 4 characters, 8 bytes
        assert_eq!(length_rule("éééé"), Some("At least 8 characters".to_string()));
    }
}
