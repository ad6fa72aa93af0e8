use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::value::Record;

/// JSON object request body. Malformed JSON and non-object bodies are turned
/// into [`ApiError`]s so they render through the same error boundary.
#[derive(Debug, Clone)]
pub struct RecordBody(pub Record);

#[axum::async_trait]
impl<S> FromRequest<S> for RecordBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        match value {
            Value::Object(record) => Ok(RecordBody(record)),
            _ => Err(ApiError::bad_request("Request body must be a JSON object")),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(rejection.body_text())
    } else {
        ApiError::invalid_json(rejection.body_text())
    }
}
