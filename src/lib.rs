//! Marquee: a movie discovery service.
//!
//! Visitors get a search box with a debounced query, a paginated result grid,
//! a weekly trending strip and a detail overlay, all backed by a TMDB-style
//! catalog. Successful searches are counted by a usage recorder.

use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod recorder;
pub mod routes;
pub mod telemetry;
pub mod views;

#[cfg(test)]
mod test_utils;

use catalog::Catalog;
use config::AppConfig;
use discovery::SessionStore;
use recorder::UsageRecorder;

/// Shared handler state
#[derive(Clone)]
pub struct Ctx {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn Catalog>,
    pub recorder: Option<Arc<dyn UsageRecorder>>,
    pub sessions: SessionStore,
}

impl Ctx {
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn Catalog>,
        recorder: Option<Arc<dyn UsageRecorder>>,
    ) -> Self {
        let sessions = SessionStore::new(
            Arc::clone(&catalog),
            recorder.clone(),
            config.discovery.options(),
            config.discovery.max_sessions,
            config.discovery.session_ttl(),
        );

        Self {
            config: Arc::new(config),
            catalog,
            recorder,
            sessions,
        }
    }
}

/// JSON envelope returned by every `/api` route
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Build the full router: pages, SSE, JSON API and static assets
pub fn app(ctx: Ctx) -> Router {
    let assets = ServeDir::new(&ctx.config.server.assets_dir);

    Router::new()
        .merge(views::mount())
        .nest("/api", routes::api::mount())
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
