//! Password strength scorer - rule checklist scoring.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::blacklist::Blacklist;
use crate::rules::{blacklist_rule, SCORED_RULES};

/// Number of scored rules, and so the best possible score.
pub const MAX_SCORE: u8 = SCORED_RULES.len() as u8;

const VALIDATION_FAILED: &str = "Unable to validate password strength";

/// Label shown next to the strength meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=2 => PasswordStrength::Weak,
            3 => PasswordStrength::Fair,
            4 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        };
        f.write_str(label)
    }
}

/// Score, unmet-rule feedback and verdict for one password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrengthResult {
    /// Satisfied rules, `0..=MAX_SCORE`.
    pub score: u8,
    /// Feedback for every unmet rule, in rule order.
    pub feedback: Vec<String>,
    /// True only when every rule is met and the password is not blacklisted.
    pub is_valid: bool,
}

impl PasswordStrengthResult {
    /// Result reported when the strength check itself could not run.
    pub fn validation_failed() -> Self {
        Self {
            score: 0,
            feedback: vec![VALIDATION_FAILED.to_string()],
            is_valid: false,
        }
    }

    pub fn strength(&self) -> PasswordStrength {
        PasswordStrength::from_score(self.score)
    }
}

/// Scores passwords, optionally against a common-password list.
#[derive(Debug, Clone, Default)]
pub struct PasswordScorer {
    blacklist: Option<Blacklist>,
}

impl PasswordScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blacklist(blacklist: Blacklist) -> Self {
        Self {
            blacklist: Some(blacklist),
        }
    }

    /// Runs every rule against `password`.
    ///
    /// A blacklist hit adds feedback and makes the result invalid but does not
    /// lower the score.
    pub fn score(&self, password: &SecretString) -> PasswordStrengthResult {
        let pwd = password.expose_secret();
        let mut feedback = Vec::new();
        let mut score = 0u8;

        for (_rule_name, rule) in SCORED_RULES {
            match rule(pwd) {
                Some(unmet) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(rule = _rule_name, "password rule not met");
                    feedback.push(unmet);
                }
                None => score += 1,
            }
        }

        let mut is_valid = score == MAX_SCORE;

        if let Some(blacklist) = &self.blacklist {
            if let Some(reason) = blacklist_rule(pwd, blacklist) {
                feedback.push(reason);
                is_valid = false;
            }
        }

        PasswordStrengthResult {
            score,
            feedback,
            is_valid,
        }
    }
}

/// Scores `password` with the five checklist rules and no blacklist.
pub fn score_password(password: &SecretString) -> PasswordStrengthResult {
    PasswordScorer::new().score(password)
}

/// Runs an external strength check, mapping any failure to
/// [`PasswordStrengthResult::validation_failed`].
///
/// The check is not retried.
#[cfg(feature = "async")]
pub async fn score_password_remote<F, Fut, E>(
    password: &SecretString,
    check: F,
) -> PasswordStrengthResult
where
    F: FnOnce(&SecretString) -> Fut,
    Fut: Future<Output = Result<PasswordStrengthResult, E>>,
    E: fmt::Display,
{
    match check(password).await {
        Ok(result) => result,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::error!("Remote password strength check failed: {}", _e);
            PasswordStrengthResult::validation_failed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_all_rules_met() {
        let result = score_password(&secret("Abc123!@"));
        assert_eq!(result.score, 5);
        assert!(result.is_valid);
        assert!(result.feedback.is_empty());
        assert_eq!(result.strength(), PasswordStrength::Strong);
    }

    #[test]
    fn test_seven_characters_fail_even_with_full_variety() {
        let result = score_password(&secret("Ab1!xyz"));
        assert_eq!(result.score, 4);
        assert!(!result.is_valid);
        assert_eq!(result.feedback, vec!["At least 8 characters".to_string()]);
    }

    #[test]
    fn test_short_passwords_are_never_valid() {
        for pwd in ["", "a", "A1!", "Aa1!Aa1", "!@#$%^&"] {
            assert!(!score_password(&secret(pwd)).is_valid, "password {:?}", pwd);
        }
    }

    #[test]
    fn test_empty_password() {
        let result = score_password(&secret(""));
        assert_eq!(result.score, 0);
        assert_eq!(result.strength(), PasswordStrength::Weak);
        assert_eq!(
            result.feedback,
            vec![
                "At least 8 characters",
                "One uppercase letter",
                "One lowercase letter",
                "One number",
                "One special character",
            ]
        );
    }

    #[test]
    fn test_partial_score_is_not_valid() {
        let result = score_password(&secret("abcdefgh1"));
        assert_eq!(result.score, 3);
        assert!(!result.is_valid);
        assert_eq!(result.strength(), PasswordStrength::Fair);
        assert_eq!(
            result.feedback,
            vec!["One uppercase letter", "One special character"]
        );
    }

    #[test]
    fn test_strength_labels() {
        assert_eq!(PasswordStrength::from_score(0), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::from_score(2), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::from_score(3), PasswordStrength::Fair);
        assert_eq!(PasswordStrength::from_score(4), PasswordStrength::Good);
        assert_eq!(PasswordStrength::from_score(5), PasswordStrength::Strong);
        assert_eq!(PasswordStrength::Good.to_string(), "Good");
    }

    #[test]
    fn test_blacklisted_password_keeps_score_but_is_invalid() {
        let scorer = PasswordScorer::with_blacklist(Blacklist::from_words(["P@ssw0rd"]));
        let result = scorer.score(&secret("p@ssw0rD"));
        assert_eq!(result.score, 5);
        assert!(!result.is_valid);
        assert_eq!(result.feedback, vec!["Password is too common".to_string()]);
    }

    #[test]
    fn test_validation_failed_fallback() {
        let result = PasswordStrengthResult::validation_failed();
        assert_eq!(result.score, 0);
        assert!(!result.is_valid);
        assert_eq!(result.feedback, vec!["Unable to validate password strength"]);
    }
}
