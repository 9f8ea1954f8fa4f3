use crate::catalog::MovieSummary;
use crate::recorder::{Result, SearchCount};
use async_trait::async_trait;

/// Counter store for search popularity
#[async_trait]
pub trait UsageRecorder: Send + Sync {
    /// Backend identifier (e.g., "appwrite", "memory")
    fn id(&self) -> &'static str;

    /// Increment the counter for `query`, creating it with `movie` as the
    /// representative result when absent
    async fn record(&self, query: &str, movie: &MovieSummary) -> Result<SearchCount>;

    /// Most recorded queries, highest count first
    async fn top(&self, limit: usize) -> Result<Vec<SearchCount>>;
}
