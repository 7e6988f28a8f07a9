use once_cell::sync::Lazy;
use regex::Regex;

/// Input validation utilities for the auth service

// Compile regex patterns once at startup
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // This regex is hardcoded and validated - it is a compile-time constant in practice
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Minimum password length accepted by the strength policy.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Validate password against the minimum strength policy.
pub fn password_is_strong_enough(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
}

/// Normalize an email for storage and lookup: trim and lowercase.
///
/// Uniqueness is enforced on the normalized form, so "User@X.com" and
/// "user@x.com" are the same login key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@sub.example.co.uk"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!validate_email("invalid"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_password_policy() {
        assert!(password_is_strong_enough("longpw12"));
        assert!(password_is_strong_enough("correct-horse-battery-staple"));
        assert!(!password_is_strong_enough("short1"));
        assert!(!password_is_strong_enough(""));
    }

    #[test]
    fn test_password_policy_length_boundary() {
        // 7 characters is one short of the minimum
        assert!(!password_is_strong_enough("longpw1"));
        assert!(password_is_strong_enough("longpw12"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }
}
