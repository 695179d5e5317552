//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Unparseable bodies become [`AppError::InvalidInput`]; rule failures become
/// [`AppError::ValidationFailed`] with one message per request.
pub struct ValidatedJson<T>(pub T);

/// Message of the first failing rule, taking fields in name order so the
/// same request always yields the same text.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errs)| errs.iter().map(move |err| (field, err)))
        .find_map(|(field, err)| match &err.message {
            Some(message) => Some(message.to_string()),
            None => Some(format!("{} is invalid ({})", field, err.code)),
        })
        .unwrap_or_else(|| "Validation failed".to_string())
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;

        match payload.validate() {
            Ok(()) => Ok(ValidatedJson(payload)),
            Err(errors) => Err(AppError::validation(describe(&errors))),
        }
    }
}
