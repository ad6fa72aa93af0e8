use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that adds the `success` flag.
///
/// Object payloads are merged into the envelope next to `success`, so
/// `{ "id": .., "createdAt": .. }` goes out as
/// `{ "success": true, "id": .., "createdAt": .. }`. Anything else is placed
/// under `data`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = Map::new();
        envelope.insert("success".into(), Value::Bool(true));
        match data_value {
            Value::Object(fields) => envelope.extend(fields),
            other => {
                envelope.insert("data".into(), other);
            }
        }

        (status, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn object_payload_is_flattened() {
        let response = ApiResponse::created(json!({ "id": "abc" })).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_of(response).await, json!({ "success": true, "id": "abc" }));
    }

    #[tokio::test]
    async fn non_object_payload_goes_under_data() {
        let response = ApiResponse::success(vec![1, 2]).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, json!({ "success": true, "data": [1, 2] }));
    }
}
