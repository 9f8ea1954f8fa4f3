//! Search popularity recording.
//!
//! Every successful non-empty search reports its query and top result to a
//! [`UsageRecorder`], which upserts a counter keyed by the literal query text.
//! Recording never sits on the request path: [`spawn_record`] detaches it and
//! failures end up in the log.

mod appwrite;
mod memory;
mod traits;

pub use appwrite::{AppwriteConfig, AppwriteRecorder};
pub use memory::MemoryRecorder;
pub use traits::UsageRecorder;

use crate::catalog::MovieSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Recorder result type
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Recorder error types
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Popularity record for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCount {
    pub query: String,
    pub count: u64,
    pub movie_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Record a search on a detached task; the outcome is only logged
pub fn spawn_record(
    recorder: Arc<dyn UsageRecorder>,
    query: String,
    movie: MovieSummary,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match recorder.record(&query, &movie).await {
            Ok(record) => debug!(
                "Recorded search '{}' via {} (count: {})",
                query,
                recorder.id(),
                record.count
            ),
            Err(e) => warn!("Failed to record search '{}': {}", query, e),
        }
    })
}
