use axum::{
    extract::{Query, State},
    Extension, Json,
};
use dlmeta_core::ProductMetadata;
use dlmeta_scraper::ScraperError;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LookupQuery {
    pub code: Option<String>,
}

pub(super) async fn lookup_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ApiResponse<ProductMetadata>>, ApiError> {
    let Some(code) = query
        .code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    else {
        return Err(ApiError::missing_code());
    };

    let data = state
        .client
        .fetch_metadata(code)
        .await
        .map_err(|e| map_scraper_error(&req_id.0, code, &e))?;

    tracing::info!(request_id = %req_id.0, code = %data.rj_code, "product lookup succeeded");
    Ok(Json(ApiResponse { data }))
}

pub(super) fn map_scraper_error(request_id: &str, code: &str, error: &ScraperError) -> ApiError {
    if error.is_not_found() {
        tracing::info!(request_id, code, "product not found");
    } else {
        tracing::error!(request_id, code, error = %error, "product lookup failed");
    }
    ApiError::from(error)
}
