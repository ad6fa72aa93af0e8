use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::database::ListParams;
use crate::error::ApiError;

/// Listing query string, read leniently. Repeated keys keep their first
/// value and unknown keys are ignored, so a query string never fails the
/// request on its own; bad numbers fall back to defaults later on.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery(pub ListParams);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ListingQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        Ok(ListingQuery(ListParams::from_pairs(pairs)))
    }
}
