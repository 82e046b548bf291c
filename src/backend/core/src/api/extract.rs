//! Request body extraction with validation.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ErrorCode};
use crate::validation::Validate;

/// A JSON body that has been deserialized and validated.
///
/// Malformed bodies and validation failures are rejected with 400 before
/// the handler runs.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::new(ErrorCode::DeserializationError, rejection.body_text())
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}
