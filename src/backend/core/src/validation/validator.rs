//! The `Validate` trait and the builders used to implement it.

use crate::validation::error::{FieldError, ValidationErrorKind, ValidationErrors, ValidationResult};
use crate::validation::rules::ValidationRule;

// ═══════════════════════════════════════════════════════════════════════════════
// Validate Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait for request bodies that can be validated synchronously.
pub trait Validate {
    /// Validate this object and return any validation errors.
    fn validate(&self) -> ValidationResult<()>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate and return self if valid, otherwise return errors.
    fn validated(self) -> ValidationResult<Self>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// A builder for validating a single field with multiple rules.
pub struct FieldValidator<'a, T> {
    field_name: &'a str,
    value: &'a T,
    errors: Vec<FieldError>,
}

impl<'a, T> FieldValidator<'a, T> {
    pub fn new(field_name: &'a str, value: &'a T) -> Self {
        Self {
            field_name,
            value,
            errors: Vec::new(),
        }
    }

    /// Apply a validation rule.
    pub fn rule<R: ValidationRule<T>>(mut self, rule: R) -> Self {
        if let Some(error) = rule.validate(self.value) {
            self.errors.push(error);
        }
        self
    }

    /// Apply a boolean check with a custom message.
    pub fn must<F>(mut self, predicate: F, message: &str) -> Self
    where
        F: FnOnce(&T) -> bool,
    {
        if !predicate(self.value) {
            self.errors.push(FieldError::with_message(
                ValidationErrorKind::Custom {
                    code: self.field_name.to_string(),
                },
                message,
            ));
        }
        self
    }

    pub fn field_name(&self) -> &str {
        self.field_name
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Add the field's errors to a ValidationErrors collection.
    pub fn collect_into(self, errors: &mut ValidationErrors) {
        for error in self.errors {
            errors.add(self.field_name, error);
        }
    }

    pub fn result(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            let mut validation_errors = ValidationErrors::new();
            self.collect_into(&mut validation_errors);
            Err(validation_errors)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Request Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// A builder for validating entire request objects with multiple fields.
#[derive(Default)]
pub struct RequestValidator {
    errors: ValidationErrors,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a field and collect any errors.
    pub fn field<T>(mut self, validator: FieldValidator<'_, T>) -> Self {
        validator.collect_into(&mut self.errors);
        self
    }

    pub fn merge(mut self, other: ValidationErrors) -> Self {
        self.errors.merge(other);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn result(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Start validating a single field.
pub fn validate_field<'a, T>(field_name: &'a str, value: &'a T) -> FieldValidator<'a, T> {
    FieldValidator::new(field_name, value)
}

/// Start validating a request object.
pub fn validate_request() -> RequestValidator {
    RequestValidator::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::{Email, MinLength, Required};

    struct SignUp {
        name: String,
        email: String,
        password: String,
    }

    impl Validate for SignUp {
        fn validate(&self) -> ValidationResult<()> {
            validate_request()
                .field(validate_field("name", &self.name).rule(Required))
                .field(validate_field("email", &self.email).rule(Email))
                .field(validate_field("password", &self.password).rule(MinLength(6)))
                .result()
        }
    }

    #[test]
    fn test_valid_request() {
        let request = SignUp {
            name: "John".into(),
            email: "john@acme.com".into(),
            password: "secret".into(),
        };
        assert!(request.is_valid());
        assert!(request.validated().is_ok());
    }

    #[test]
    fn test_collects_every_failing_field() {
        let request = SignUp {
            name: "".into(),
            email: "nope".into(),
            password: "123".into(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.error_count(), 3);
        assert!(errors.has_errors("name"));
        assert!(errors.has_errors("email"));
        assert!(errors.has_errors("password"));
    }

    #[test]
    fn test_must_uses_custom_message() {
        let value = 5u32;
        let errors = validate_field("count", &value)
            .must(|v| *v > 10, "count must be above ten")
            .result()
            .unwrap_err();
        assert_eq!(
            errors.get("count").unwrap()[0].message,
            "count must be above ten"
        );
    }
}
