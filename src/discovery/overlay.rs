use super::Changes;
use crate::catalog::{Catalog, CatalogError, MovieDetail, MovieSummary};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

const DETAIL_ERROR: &str = "Could not load movie details. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OverlayState {
    #[default]
    Closed,
    Loading {
        movie: MovieSummary,
    },
    Ready {
        detail: Box<MovieDetail>,
    },
    Failed {
        movie: MovieSummary,
        message: String,
    },
}

impl OverlayState {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Detail overlay controller; nothing is cached between opens
pub struct DetailOverlay {
    catalog: Arc<dyn Catalog>,
    state: RwLock<(u64, OverlayState)>,
    changes: Changes,
}

impl DetailOverlay {
    pub fn new(catalog: Arc<dyn Catalog>, changes: Changes) -> Self {
        Self {
            catalog,
            state: RwLock::new((0, OverlayState::Closed)),
            changes,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state.read().1.clone()
    }

    /// Show the spinner for `movie` and fetch its details
    pub async fn open(&self, movie: MovieSummary) {
        let id = movie.id;
        let token = {
            let mut state = self.state.write();
            state.0 += 1;
            state.1 = OverlayState::Loading {
                movie: movie.clone(),
            };
            state.0
        };
        self.changes.bump();

        let outcome = self.catalog.details(id).await;

        {
            let mut state = self.state.write();
            if state.0 != token {
                debug!("Dropping details for movie {} after close or re-open", id);
                return;
            }

            state.1 = match outcome {
                Ok(detail) => OverlayState::Ready {
                    detail: Box::new(detail),
                },
                Err(e) => {
                    warn!("Error fetching movie details for {}: {}", id, e);
                    OverlayState::Failed {
                        movie,
                        message: detail_message(&e),
                    }
                }
            };
        }
        self.changes.bump();
    }

    /// Close and discard whatever was loaded
    pub fn close(&self) {
        {
            let mut state = self.state.write();
            if !state.1.is_open() {
                return;
            }
            state.0 += 1;
            state.1 = OverlayState::Closed;
        }
        self.changes.bump();
    }
}

fn detail_message(err: &CatalogError) -> String {
    match err {
        CatalogError::Rejected(message) => message.clone(),
        CatalogError::NotFound(_) => "This movie is no longer available.".to_string(),
        _ => DETAIL_ERROR.to_string(),
    }
}
