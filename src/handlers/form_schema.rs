use axum::{extract::State, Json};

use crate::app::AppState;
use crate::schema::FormSchema;

/// GET /api/form-schema - The form definition, served as-is (no envelope)
pub async fn get(State(state): State<AppState>) -> Json<FormSchema> {
    Json(state.schema.as_ref().clone())
}
