mod http;
mod images;
mod tmdb;
mod traits;
mod types;


pub use http::{CatalogConfig, HttpClient};
pub use images::{ImageCdn, ImageSize, PLACEHOLDER_POSTER, PLACEHOLDER_PROFILE};
pub use tmdb::{Endpoint, TmdbCatalog};
pub use traits::Catalog;
pub use types::{CastMember, Genre, MovieDetail, MoviePage, MovieSummary, Video};

/// Message used when a rejected payload carries no message of its own
pub const FALLBACK_REJECTION: &str = "Failed to fetch movies";

/// Catalog result type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Catalog error types
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The catalog answered 2xx but reported a logical failure in the body
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Whether the failure was reported inside a successful response body
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
