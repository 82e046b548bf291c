//! Validation rules shared by the request DTOs.

use crate::validation::error::{FieldError, ValidationErrorKind};
use regex::Regex;
use std::sync::LazyLock;

/// Email validation regex (RFC 5322 simplified).
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("Invalid email regex")
});

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Rule Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// A validation rule that can be applied to a value.
pub trait ValidationRule<T> {
    /// Validate the value and return any errors.
    fn validate(&self, value: &T) -> Option<FieldError>;

    /// Get a description of this rule.
    fn description(&self) -> String;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Required
// ═══════════════════════════════════════════════════════════════════════════════

/// Rule that validates a string is present and not blank.
#[derive(Debug, Clone)]
pub struct Required;

impl ValidationRule<String> for Required {
    fn validate(&self, value: &String) -> Option<FieldError> {
        if value.trim().is_empty() {
            Some(FieldError::new(ValidationErrorKind::Required))
        } else {
            None
        }
    }

    fn description(&self) -> String {
        "field is required".to_string()
    }
}

impl ValidationRule<Option<String>> for Required {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        match value {
            Some(s) if !s.trim().is_empty() => None,
            _ => Some(FieldError::new(ValidationErrorKind::Required)),
        }
    }

    fn description(&self) -> String {
        "field is required and must not be empty".to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Length
// ═══════════════════════════════════════════════════════════════════════════════

/// Minimum length in characters.
#[derive(Debug, Clone)]
pub struct MinLength(pub usize);

impl ValidationRule<String> for MinLength {
    fn validate(&self, value: &String) -> Option<FieldError> {
        let len = value.chars().count();
        if len < self.0 {
            Some(FieldError::new(ValidationErrorKind::MinLength {
                min: self.0,
                actual: len,
            }))
        } else {
            None
        }
    }

    fn description(&self) -> String {
        format!("minimum length: {}", self.0)
    }
}

impl ValidationRule<Option<String>> for MinLength {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        value.as_ref().and_then(|v| ValidationRule::<String>::validate(self, v))
    }

    fn description(&self) -> String {
        format!("minimum length: {} (if present)", self.0)
    }
}

/// Maximum length in characters.
#[derive(Debug, Clone)]
pub struct MaxLength(pub usize);

impl ValidationRule<String> for MaxLength {
    fn validate(&self, value: &String) -> Option<FieldError> {
        let len = value.chars().count();
        if len > self.0 {
            Some(FieldError::new(ValidationErrorKind::MaxLength {
                max: self.0,
                actual: len,
            }))
        } else {
            None
        }
    }

    fn description(&self) -> String {
        format!("maximum length: {}", self.0)
    }
}

impl ValidationRule<Option<String>> for MaxLength {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        value.as_ref().and_then(|v| ValidationRule::<String>::validate(self, v))
    }

    fn description(&self) -> String {
        format!("maximum length: {} (if present)", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Email
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct Email;

impl ValidationRule<String> for Email {
    fn validate(&self, value: &String) -> Option<FieldError> {
        if EMAIL_REGEX.is_match(value) {
            None
        } else {
            Some(FieldError::new(ValidationErrorKind::InvalidEmail))
        }
    }

    fn description(&self) -> String {
        "must be a valid email address".to_string()
    }
}

impl ValidationRule<Option<String>> for Email {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        value.as_ref().and_then(|v| ValidationRule::<String>::validate(self, v))
    }

    fn description(&self) -> String {
        "must be a valid email address (if present)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(Required.validate(&"Acme".to_string()).is_none());
        assert!(Required.validate(&"   ".to_string()).is_some());
        assert!(Required.validate(&None::<String>).is_some());
        assert!(Required.validate(&Some("x".to_string())).is_none());
    }

    #[test]
    fn test_min_length_counts_chars() {
        assert!(MinLength(6).validate(&"secret".to_string()).is_none());
        assert!(MinLength(6).validate(&"abc".to_string()).is_some());
        assert!(MinLength(3).validate(&"çãé".to_string()).is_none());
        assert!(MinLength(6).validate(&None::<String>).is_none());
    }

    #[test]
    fn test_max_length() {
        assert!(MaxLength(3).validate(&"abcd".to_string()).is_some());
        assert!(MaxLength(3).validate(&"abc".to_string()).is_none());
    }

    #[test]
    fn test_email() {
        assert!(Email.validate(&"john@acme.com".to_string()).is_none());
        assert!(Email.validate(&"john.doe+tag@mail.acme.com".to_string()).is_none());
        assert!(Email.validate(&"not-an-email".to_string()).is_some());
        assert!(Email.validate(&"john@".to_string()).is_some());
        assert!(Email.validate(&None::<String>).is_none());
    }
}
