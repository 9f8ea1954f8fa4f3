use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{
    ApiResponse, Ctx,
    catalog::{CatalogError, MovieDetail, MoviePage, MovieSummary},
    error::{ApiError, ApiResult, api_error, catalog_status},
};

/// Query parameters for movie listing
#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    /// Free-text query; empty browses by popularity
    #[serde(default)]
    pub query: String,
    /// Page number (1-indexed)
    pub page: Option<u32>,
}

fn failed(action: &str, e: &CatalogError) -> ApiError {
    tracing::warn!("Catalog {} failed: {}", action, e);
    let message = match e {
        CatalogError::Rejected(message) => message.clone(),
        other => format!("{action} failed: {other}"),
    };
    api_error(catalog_status(e), message)
}

/// GET /api/catalog/movies?query=...&page=...
async fn movies(State(ctx): State<Ctx>, Query(params): Query<MoviesQuery>) -> ApiResult<MoviePage> {
    let page = params.page.unwrap_or(1).max(1);
    let results = ctx
        .catalog
        .movies(params.query.trim(), page)
        .await
        .map_err(|e| failed("Search", &e))?;

    Ok(Json(ApiResponse::ok("Movies retrieved", results)))
}

/// GET /api/catalog/trending
async fn trending(State(ctx): State<Ctx>) -> ApiResult<Vec<MovieSummary>> {
    let mut movies = ctx
        .catalog
        .trending()
        .await
        .map_err(|e| failed("Trending", &e))?;
    movies.truncate(ctx.config.discovery.trending_limit);

    Ok(Json(ApiResponse::ok("Trending retrieved", movies)))
}

/// GET /api/catalog/movies/{id}
async fn details(State(ctx): State<Ctx>, Path(id): Path<i64>) -> ApiResult<MovieDetail> {
    let detail = ctx
        .catalog
        .details(id)
        .await
        .map_err(|e| failed("Details", &e))?;

    Ok(Json(ApiResponse::ok("Details retrieved", detail)))
}

pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/catalog/movies", get(movies))
        .route("/catalog/movies/{id}", get(details))
        .route("/catalog/trending", get(trending))
}
