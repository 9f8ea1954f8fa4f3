use super::Changes;
use crate::catalog::{Catalog, CatalogError, MovieSummary};
use crate::recorder::{UsageRecorder, spawn_record};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Banner text for transport and HTTP failures
pub const GENERIC_FETCH_ERROR: &str = "Error fetching movies. Please try again later.";

/// First-page lifecycle of the result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Paginated results for the current effective query
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListState {
    pub query: String,
    pub page: u32,
    /// Reported page count; zero when the catalog did not say
    pub total_pages: u32,
    pub movies: Vec<MovieSummary>,
    pub phase: ListPhase,
    pub loading_more: bool,
    pub error: Option<String>,
    #[serde(skip)]
    token: u64,
}

impl ListState {
    /// Whether a "load more" request would be accepted now
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        !self.movies.is_empty()
            && !self.loading_more
            && self.phase != ListPhase::Loading
            && (self.total_pages == 0 || self.page < self.total_pages)
    }
}

/// Result list controller
pub struct ResultList {
    catalog: Arc<dyn Catalog>,
    recorder: Option<Arc<dyn UsageRecorder>>,
    state: RwLock<ListState>,
    changes: Changes,
}

impl ResultList {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        recorder: Option<Arc<dyn UsageRecorder>>,
        changes: Changes,
    ) -> Self {
        Self {
            catalog,
            recorder,
            state: RwLock::new(ListState::default()),
            changes,
        }
    }

    pub fn snapshot(&self) -> ListState {
        self.state.read().clone()
    }

    /// Replace the list with page 1 of `query`.
    ///
    /// A response that arrives after a newer call has started is dropped.
    pub async fn load_first_page(&self, query: &str) {
        let token = self.begin_first_page(query);
        self.finish_first_page(token, query).await;
    }

    /// Reset to a loading page 1 and claim a request token.
    ///
    /// Split from the fetch so callers that spawn the fetch still hand out
    /// tokens in the order queries were committed.
    pub(crate) fn begin_first_page(&self, query: &str) -> u64 {
        let token = {
            let mut state = self.state.write();
            state.token += 1;
            state.query = query.to_string();
            state.page = 1;
            state.total_pages = 0;
            state.phase = ListPhase::Loading;
            state.loading_more = false;
            state.error = None;
            state.token
        };
        self.changes.bump();
        token
    }

    pub(crate) async fn finish_first_page(&self, token: u64, query: &str) {
        let outcome = self.catalog.movies(query, 1).await;

        let top = {
            let mut state = self.state.write();
            if state.token != token {
                debug!("Discarding stale first page for '{}'", query);
                return;
            }

            match outcome {
                Ok(page) => {
                    debug!(
                        "Loaded {} movies for '{}' ({} pages)",
                        page.results.len(),
                        query,
                        page.total_pages
                    );
                    state.total_pages = page.total_pages;
                    state.movies = page.results;
                    state.phase = ListPhase::Loaded;
                    state.movies.first().cloned().filter(|_| !query.is_empty())
                }
                Err(e) => {
                    state.movies.clear();
                    state.error = Some(failure_message(query, &e));
                    state.phase = ListPhase::Errored;
                    None
                }
            }
        };
        self.changes.bump();

        if let (Some(movie), Some(recorder)) = (top, &self.recorder) {
            spawn_record(Arc::clone(recorder), query.to_string(), movie);
        }
    }

    /// Append the next page of the current query.
    ///
    /// Returns `false` when the request was refused: nothing listed, a page
    /// fetch already outstanding, or no pages left.
    pub async fn load_next_page(&self) -> bool {
        let (token, query, next) = {
            let mut state = self.state.write();
            if !state.can_load_more() {
                return false;
            }
            state.loading_more = true;
            state.error = None;
            (state.token, state.query.clone(), state.page + 1)
        };
        self.changes.bump();

        let outcome = self.catalog.movies(&query, next).await;

        {
            let mut state = self.state.write();
            if state.token != token {
                debug!("Discarding stale page {} for '{}'", next, query);
                return true;
            }

            state.loading_more = false;
            match outcome {
                Ok(page) => {
                    state.page = next;
                    state.total_pages = page.total_pages;
                    state.movies.extend(page.results);
                    state.phase = ListPhase::Loaded;
                }
                Err(e) => {
                    if e.is_rejection() {
                        state.movies.clear();
                    }
                    state.error = Some(failure_message(&query, &e));
                    state.phase = ListPhase::Errored;
                }
            }
        }
        self.changes.bump();

        true
    }
}

fn failure_message(query: &str, err: &CatalogError) -> String {
    match err {
        CatalogError::Rejected(message) => {
            info!("Catalog rejected query '{}': {}", query, message);
            message.clone()
        }
        other => {
            warn!("Error fetching movies for '{}': {}", query, other);
            GENERIC_FETCH_ERROR.to_string()
        }
    }
}
