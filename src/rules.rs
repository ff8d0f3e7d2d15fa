use crate::payload::Payload;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use thiserror::Error;

/// Keys that must all be present before the prompt offers to finish.
pub const REQUIRED_KEYS: [&str; 2] = ["user_key", "email"];

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\A[\w+\-.]+@[a-z\d\-]+(\.[a-z\d\-]+)*\.[a-z]+\z")
        .case_insensitive(true)
        .unicode(false)
        .build()
        .expect("email pattern must compile")
});

/// A value was rejected by the rule registered for its key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid format for {key}. Try again.")]
pub struct ValidationError {
    pub key: String,
}

/// Validator attached to a recognized key name.
pub struct KeyRule {
    pub key: &'static str,
    pub accepts: fn(&str) -> bool,
}

/// Every key with a format rule. Keys not listed here accept any value.
pub static RULES: &[KeyRule] = &[KeyRule {
    key: "email",
    accepts: is_email,
}];

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn rule_for(key: &str) -> Option<&'static KeyRule> {
    RULES.iter().find(|rule| rule.key == key)
}

/// Check `value` against the rule for `key`, if there is one.
pub fn validate(key: &str, value: &str) -> Result<(), ValidationError> {
    match rule_for(key) {
        Some(rule) if !(rule.accepts)(value) => Err(ValidationError {
            key: key.to_string(),
        }),
        _ => Ok(()),
    }
}

pub fn required_present(payload: &Payload) -> bool {
    REQUIRED_KEYS.iter().all(|key| payload.contains_key(key))
}
