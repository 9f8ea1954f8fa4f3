use axum::Router;

use crate::Ctx;

pub mod catalog;
pub mod health;
pub mod searches;
pub mod sessions;


/// Mount all API routes
pub fn mount() -> Router<Ctx> {
    Router::new()
        .merge(health::mount())
        .merge(sessions::mount())
        .merge(catalog::mount())
        .merge(searches::mount())
}
