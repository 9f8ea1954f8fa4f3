use crate::catalog::{
    Result,
    types::{MovieDetail, MoviePage, MovieSummary},
};
use async_trait::async_trait;

/// Read access to a movie catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Catalog identifier (e.g., "tmdb")
    fn id(&self) -> &'static str;

    /// Popularity-sorted browse listing
    async fn discover(&self, page: u32) -> Result<MoviePage>;

    /// Free-text title search
    async fn search(&self, query: &str, page: u32) -> Result<MoviePage>;

    /// This week's trending movies
    async fn trending(&self) -> Result<Vec<MovieSummary>>;

    /// Extended metadata with credits and videos
    async fn details(&self, id: i64) -> Result<MovieDetail>;

    /// Browse when the query is empty, search otherwise
    async fn movies(&self, query: &str, page: u32) -> Result<MoviePage> {
        if query.is_empty() {
            self.discover(page).await
        } else {
            self.search(query, page).await
        }
    }
}
