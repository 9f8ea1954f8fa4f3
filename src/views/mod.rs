//! Server-rendered discovery page.
//!
//! The browser keeps a session cookie, posts raw interactions (keystrokes,
//! clicks) and receives re-rendered regions over server-sent events.

use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{
        Html, IntoResponse, Response,
        sse::{KeepAlive, Sse},
    },
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::Ctx;
use crate::discovery::Session;

pub mod pages;
pub mod regions;

#[cfg(test)]
mod tests;

use pages::IndexTemplate;
use regions::{Regions, region_events};

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "marquee_session";

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub term: String,
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

async fn current(ctx: &Ctx, jar: &CookieJar) -> Result<Arc<Session>, StatusCode> {
    let id = session_id(jar).ok_or(StatusCode::UNAUTHORIZED)?;
    ctx.sessions.get(&id).await.ok_or(StatusCode::NOT_FOUND)
}

/// Render the page, starting a session when the cookie is missing or stale
async fn index(State(ctx): State<Ctx>, jar: CookieJar) -> Response {
    let session = ctx.sessions.get_or_create(session_id(&jar)).await;
    let view = session.view();
    let regions = Regions::render(&view);

    let page = IndexTemplate {
        term: view.term,
        term_html: regions.term,
        hero_html: regions.hero,
        trending_html: regions.trending,
        movies_html: regions.movies,
        overlay_html: regions.overlay,
    };

    let body = match askama::Template::render(&page) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to render index: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let cookie = Cookie::build((SESSION_COOKIE, session.id().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), Html(body)).into_response()
}

/// GET /events
async fn events(State(ctx): State<Ctx>, jar: CookieJar) -> Response {
    match current(&ctx, &jar).await {
        Ok(session) => Sse::new(region_events(ctx.sessions.clone(), session))
            .keep_alive(KeepAlive::default())
            .into_response(),
        Err(status) => status.into_response(),
    }
}

/// POST /search
async fn search(
    State(ctx): State<Ctx>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> StatusCode {
    match current(&ctx, &jar).await {
        Ok(session) => {
            session.input(form.term);
            StatusCode::NO_CONTENT
        }
        Err(status) => status,
    }
}

/// POST /more
async fn more(State(ctx): State<Ctx>, jar: CookieJar) -> StatusCode {
    match current(&ctx, &jar).await {
        Ok(session) => {
            session.load_more();
            StatusCode::NO_CONTENT
        }
        Err(status) => status,
    }
}

/// POST /select/{id}
async fn select(State(ctx): State<Ctx>, jar: CookieJar, Path(movie_id): Path<i64>) -> StatusCode {
    match current(&ctx, &jar).await {
        Ok(session) if session.select(movie_id) => StatusCode::NO_CONTENT,
        Ok(_) => StatusCode::NOT_FOUND,
        Err(status) => status,
    }
}

/// POST /close
async fn close(State(ctx): State<Ctx>, jar: CookieJar) -> StatusCode {
    match current(&ctx, &jar).await {
        Ok(session) => {
            session.close();
            StatusCode::NO_CONTENT
        }
        Err(status) => status,
    }
}

pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/", get(index))
        .route("/events", get(events))
        .route("/search", post(search))
        .route("/more", post(more))
        .route("/select/{id}", post(select))
        .route("/close", post(close))
}
