//! Blacklist rule - rejects passwords from the common-password list.

use crate::blacklist::Blacklist;
use super::RuleResult;

pub fn blacklist_rule(password: &str, blacklist: &Blacklist) -> RuleResult {
    if blacklist.contains(password) {
        return Some("Password is too common".to_string());
    }
    None
}
