use super::Changes;
use crate::catalog::{Catalog, MovieSummary};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Number of trending entries kept by default
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "state", content = "movies", rename_all = "snake_case")]
pub enum TrendingState {
    #[default]
    Pending,
    Ready(Vec<MovieSummary>),
    Failed,
}

/// What the header shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hero {
    /// Fixed-height spinner while trending is in flight
    Placeholder,
    /// Static banner image
    Banner,
    /// Rotated three-poster composite: second, first and third trending entries
    Composite {
        left: Option<MovieSummary>,
        center: Option<MovieSummary>,
        right: Option<MovieSummary>,
    },
}

/// Weekly trending strip, fetched once per session
pub struct TrendingPanel {
    catalog: Arc<dyn Catalog>,
    limit: usize,
    started: AtomicBool,
    state: RwLock<TrendingState>,
    changes: Changes,
}

impl TrendingPanel {
    pub fn new(catalog: Arc<dyn Catalog>, limit: usize, changes: Changes) -> Self {
        Self {
            catalog,
            limit,
            started: AtomicBool::new(false),
            state: RwLock::new(TrendingState::Pending),
            changes,
        }
    }

    /// Fetch trending; every call after the first is a no-op
    pub async fn load_once(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Trending already requested for this session");
            return;
        }

        let next = match self.catalog.trending().await {
            Ok(mut movies) => {
                movies.truncate(self.limit);
                TrendingState::Ready(movies)
            }
            Err(e) => {
                warn!("Error fetching trending: {}", e);
                TrendingState::Failed
            }
        };

        *self.state.write() = next;
        self.changes.bump();
    }

    pub fn state(&self) -> TrendingState {
        self.state.read().clone()
    }

    pub fn movies(&self) -> Vec<MovieSummary> {
        match &*self.state.read() {
            TrendingState::Ready(movies) => movies.clone(),
            _ => Vec::new(),
        }
    }

    pub fn hero(&self) -> Hero {
        match &*self.state.read() {
            TrendingState::Ready(movies) if !movies.is_empty() => Hero::Composite {
                left: movies.get(1).cloned(),
                center: movies.first().cloned(),
                right: movies.get(2).cloned(),
            },
            TrendingState::Pending => Hero::Placeholder,
            _ => Hero::Banner,
        }
    }
}
