use axum::extract::{Path, State};
use serde::Serialize;

use crate::app::AppState;
use crate::database::{ListQuery, Submission};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ListingQuery, RecordBody};
use crate::schema::FormSchema;
use crate::validator;
use crate::value::Record;

pub const VALIDATION_FAILED: &str = "Validation failed";

#[derive(Debug, Serialize)]
pub struct Listing {
    pub data: Vec<Submission>,
    pub meta: ListingMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct Found {
    pub data: Submission,
}

#[derive(Debug, Serialize)]
pub struct Done {
    pub message: &'static str,
}

/// Server-side re-validation; the client's checks are never trusted
fn ensure_valid(schema: &FormSchema, record: &Record) -> Result<(), ApiError> {
    let errors = validator::validate(schema, record);
    if errors.is_empty() {
        return Ok(());
    }
    tracing::info!("Rejected submission with {} invalid field(s)", errors.len());
    Err(ApiError::validation_error(VALIDATION_FAILED, errors))
}

/// GET /api/submissions - Paginated, sorted, searchable listing
pub async fn list(
    State(state): State<AppState>,
    ListingQuery(params): ListingQuery,
) -> ApiResult<Listing> {
    let query = ListQuery::from_params(&params, state.config.api.default_page_size);
    let page = state.store.list(&query).await?;

    Ok(ApiResponse::success(Listing {
        data: page.items,
        meta: ListingMeta {
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        },
    }))
}

/// GET /api/submissions/:id - One stored submission
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Found> {
    let submission = state.store.get(&id).await?;
    Ok(ApiResponse::success(Found { data: submission }))
}

/// POST /api/submissions - Validate and store a new submission
pub async fn create(
    State(state): State<AppState>,
    RecordBody(record): RecordBody,
) -> ApiResult<Created> {
    ensure_valid(&state.schema, &record)?;

    let submission = state.store.create(&record).await?;
    Ok(ApiResponse::created(Created {
        id: submission.id,
        created_at: submission.created_at,
    }))
}

/// PUT /api/submissions/:id - Validate and replace a stored submission
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RecordBody(record): RecordBody,
) -> ApiResult<Done> {
    ensure_valid(&state.schema, &record)?;

    state.store.update(&id, &record).await?;
    Ok(ApiResponse::success(Done {
        message: "Updated successfully",
    }))
}

/// DELETE /api/submissions/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Done> {
    state.store.delete(&id).await?;
    Ok(ApiResponse::success(Done {
        message: "Deleted successfully",
    }))
}
