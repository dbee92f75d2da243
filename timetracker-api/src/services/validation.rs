use regex::Regex;
use shared_types::ValidationErrors;
use std::sync::OnceLock;

pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_PERSON_NAME_LEN: usize = 100;
pub const MAX_CODE_LEN: usize = 50;
pub const MAX_CATALOG_NAME_LEN: usize = 200;
pub const MAX_TEXT_LEN: usize = 1000;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_HOURS: f64 = 24.0;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is valid")
    })
}

/// Records `message` when `value` is blank. Returns whether the value is present.
pub fn require(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, message);
        false
    } else {
        true
    }
}

pub fn max_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize, label: &str) {
    if value.chars().count() > max {
        errors.add(field, format!("{} must be at most {} characters", label, max));
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// At least eight characters with an uppercase letter, a lowercase letter,
/// a digit and a character that is neither letter nor digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(char::is_uppercase)
        && password.chars().any(char::is_lowercase)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}

/// Hours must lie in `(0, 24]`; NaN is rejected too.
pub fn is_valid_hours(hours: f64) -> bool {
    hours > 0.0 && hours <= MAX_HOURS
}

/// Hours are kept at two decimal places
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
