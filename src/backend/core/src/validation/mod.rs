//! Request validation.
//!
//! Request DTOs implement [`Validate`] by chaining reusable rules per field:
//!
//! ```rust,ignore
//! use saas_core::validation::{validate_field, validate_request, Email, MinLength, Validate, ValidationResult};
//!
//! impl Validate for CreateAccountRequest {
//!     fn validate(&self) -> ValidationResult<()> {
//!         validate_request()
//!             .field(validate_field("email", &self.email).rule(Email))
//!             .field(validate_field("password", &self.password).rule(MinLength(6)))
//!             .result()
//!     }
//! }
//! ```
//!
//! Handlers call `validate()` before touching the database; the resulting
//! [`ValidationErrors`] converts into a 400 `ApiError` with per-field messages.

pub mod error;
pub mod rules;
pub mod validator;

pub use error::{FieldError, ValidationErrorKind, ValidationErrors, ValidationResult};
pub use rules::{Email, MaxLength, MinLength, Required, ValidationRule};
pub use validator::{validate_field, validate_request, FieldValidator, RequestValidator, Validate};
