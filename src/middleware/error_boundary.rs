use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::app::AppState;
use crate::error::ErrorReport;

/// Single place where error responses get their final shape.
///
/// [`crate::error::ApiError`] renders the production body and attaches an
/// [`ErrorReport`]. In development the report replaces the body so the real
/// message, status and debug detail reach the client.
pub async fn error_boundary(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    if state.config.is_development() {
        let status = response.status();
        return (status, Json(report.to_json())).into_response();
    }
    response
}
