use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    ApiResponse, Ctx,
    discovery::{Session, SessionView},
    error::{ApiError, ApiResult, api_error},
};

/// Raw search box input
#[derive(Debug, Deserialize, Validate)]
pub struct SearchInput {
    #[validate(length(max = 200))]
    pub term: String,
}

async fn find(ctx: &Ctx, id: Uuid) -> Result<Arc<Session>, ApiError> {
    ctx.sessions
        .get(&id)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Session {id} not found")))
}

/// Start a session
/// POST /api/sessions
async fn create(State(ctx): State<Ctx>) -> Json<ApiResponse<SessionView>> {
    let session = ctx.sessions.create().await;
    Json(ApiResponse::ok("Session created", session.view()))
}

/// Snapshot of a session
/// GET /api/sessions/{id}
async fn show(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> ApiResult<SessionView> {
    let session = find(&ctx, id).await?;
    Ok(Json(ApiResponse::ok("Session retrieved", session.view())))
}

/// DELETE /api/sessions/{id}
async fn remove(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> ApiResult<()> {
    ctx.sessions
        .remove(&id)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Session {id} not found")))?;

    Ok(Json(ApiResponse {
        code: 200,
        message: "Session closed".to_string(),
        data: None,
    }))
}

/// Feed raw input to the search box
/// POST /api/sessions/{id}/input
async fn input(
    State(ctx): State<Ctx>,
    Path(id): Path<Uuid>,
    Json(req): Json<SearchInput>,
) -> ApiResult<SessionView> {
    req.validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid input: {e}")))?;

    let session = find(&ctx, id).await?;
    session.input(req.term);
    Ok(Json(ApiResponse::ok("Input accepted", session.view())))
}

/// Request the next result page
/// POST /api/sessions/{id}/more
async fn more(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> ApiResult<SessionView> {
    let session = find(&ctx, id).await?;
    if !session.results().snapshot().can_load_more() {
        return Err(api_error(
            StatusCode::CONFLICT,
            "No further page can be loaded right now",
        ));
    }

    session.load_more();
    Ok(Json(ApiResponse::ok("Loading next page", session.view())))
}

/// Open the detail overlay
/// POST /api/sessions/{id}/select/{movie_id}
async fn select(
    State(ctx): State<Ctx>,
    Path((id, movie_id)): Path<(Uuid, i64)>,
) -> ApiResult<SessionView> {
    let session = find(&ctx, id).await?;
    if !session.select(movie_id) {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Movie {movie_id} is not on screen"),
        ));
    }

    Ok(Json(ApiResponse::ok("Loading details", session.view())))
}

/// POST /api/sessions/{id}/close
async fn close(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> ApiResult<SessionView> {
    let session = find(&ctx, id).await?;
    session.close();
    Ok(Json(ApiResponse::ok("Overlay closed", session.view())))
}

pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/sessions", post(create))
        .route("/sessions/{id}", get(show).delete(remove))
        .route("/sessions/{id}/input", post(input))
        .route("/sessions/{id}/more", post(more))
        .route("/sessions/{id}/select/{movie_id}", post(select))
        .route("/sessions/{id}/close", post(close))
}
