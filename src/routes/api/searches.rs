use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use crate::{
    ApiResponse, Ctx,
    error::{ApiResult, api_error},
    recorder::SearchCount,
};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

/// Most recorded searches
/// GET /api/searches/top?limit=...
async fn top(State(ctx): State<Ctx>, Query(params): Query<TopQuery>) -> ApiResult<Vec<SearchCount>> {
    let recorder = ctx.recorder.as_ref().ok_or_else(|| {
        api_error(StatusCode::SERVICE_UNAVAILABLE, "Search recording disabled")
    })?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let counts = recorder.top(limit).await.map_err(|e| {
        tracing::warn!("Failed to list top searches: {}", e);
        api_error(StatusCode::BAD_GATEWAY, format!("Top searches failed: {e}"))
    })?;

    Ok(Json(ApiResponse::ok("Top searches retrieved", counts)))
}

pub fn mount() -> Router<Ctx> {
    Router::new().route("/searches/top", get(top))
}
