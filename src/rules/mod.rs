//! Password strength rules
//!
//! Each rule checks one property and returns the feedback to show when the
//! password does not have it.

mod blacklist;
mod length;
mod variety;

pub use blacklist::blacklist_rule;
pub use length::length_rule;
pub use variety::{digit_rule, lowercase_rule, symbol_rule, uppercase_rule, SYMBOLS};

/// Result of a rule check.
/// - `Some(feedback)` - Rule not met
/// - `None` - Rule met
pub type RuleResult = Option<String>;

pub type Rule = fn(&str) -> RuleResult;

/// The scored rules, in the order their feedback is listed.
pub const SCORED_RULES: [(&str, Rule); 5] = [
    ("length", length_rule),
    ("uppercase", uppercase_rule),
    ("lowercase", lowercase_rule),
    ("digit", digit_rule),
    ("symbol", symbol_rule),
];
