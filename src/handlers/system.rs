use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - Service descriptor
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "MatBook Forms API",
            "version": version,
            "form": state.schema.title,
            "environment": format!("{:?}", state.config.environment),
            "endpoints": {
                "schema": "GET /api/form-schema",
                "submissions": "GET, POST /api/submissions",
                "submission": "GET, PUT, DELETE /api/submissions/:id",
                "health": "GET /health",
            }
        }
    }))
}

/// GET /health - Database round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}

/// Any route not matched above
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("Can't find {} on this server!", uri))
}
