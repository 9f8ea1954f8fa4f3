use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{ApiResponse, Ctx, discovery::StoreStats};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog: &'static str,
    pub recorder: Option<&'static str>,
    pub sessions: StoreStats,
}

/// GET /api/health
async fn health(State(ctx): State<Ctx>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(
        "Marquee is running",
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            catalog: ctx.catalog.id(),
            recorder: ctx.recorder.as_ref().map(|r| r.id()),
            sessions: ctx.sessions.stats(),
        },
    ))
}

pub fn mount() -> Router<Ctx> {
    Router::new().route("/health", get(health))
}
