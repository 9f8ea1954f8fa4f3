use super::search::DEFAULT_DEBOUNCE;
use super::trending::DEFAULT_TRENDING_LIMIT;
use super::{
    Changes, DetailOverlay, Hero, ListState, OverlayState, ResultList, SearchController,
    TrendingPanel, TrendingState,
};
use crate::catalog::{Catalog, MovieSummary};
use crate::recorder::UsageRecorder;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Tunables shared by every session
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub debounce: Duration,
    pub trending_limit: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            trending_limit: DEFAULT_TRENDING_LIMIT,
        }
    }
}

/// Serializable snapshot of a whole session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub revision: u64,
    pub term: String,
    pub query: String,
    pub results: ListState,
    pub can_load_more: bool,
    pub trending: TrendingState,
    pub hero: Hero,
    pub overlay: OverlayState,
}

/// One visitor's discovery screen
pub struct Session {
    id: Uuid,
    search: SearchController,
    results: Arc<ResultList>,
    trending: Arc<TrendingPanel>,
    overlay: Arc<DetailOverlay>,
    changes: Changes,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    /// Build the controllers, kick off trending and the first page.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start(
        catalog: Arc<dyn Catalog>,
        recorder: Option<Arc<dyn UsageRecorder>>,
        options: &DiscoveryOptions,
    ) -> Arc<Self> {
        let changes = Changes::new();
        let session = Arc::new(Self {
            id: Uuid::new_v4(),
            search: SearchController::new(options.debounce, changes.clone()),
            results: Arc::new(ResultList::new(
                Arc::clone(&catalog),
                recorder,
                changes.clone(),
            )),
            trending: Arc::new(TrendingPanel::new(
                Arc::clone(&catalog),
                options.trending_limit,
                changes.clone(),
            )),
            overlay: Arc::new(DetailOverlay::new(catalog, changes.clone())),
            changes,
            tasks: Mutex::new(Vec::new()),
        });

        let trending = Arc::clone(&session.trending);
        let trending_task = tokio::spawn(async move { trending.load_once().await });

        let driver = tokio::spawn(drive_results(
            session.id,
            session.search.subscribe(),
            Arc::clone(&session.results),
        ));

        session.tasks.lock().extend([trending_task, driver]);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Raw keystroke input
    pub fn input(&self, term: impl Into<String>) {
        self.search.input(term);
    }

    /// Request the next page in the background
    pub fn load_more(&self) {
        let results = Arc::clone(&self.results);
        tokio::spawn(async move {
            if !results.load_next_page().await {
                debug!("Load more ignored");
            }
        });
    }

    /// Open the overlay for a listed or trending movie; `false` when unknown
    pub fn select(&self, movie_id: i64) -> bool {
        let Some(movie) = self.find_movie(movie_id) else {
            return false;
        };

        let overlay = Arc::clone(&self.overlay);
        tokio::spawn(async move { overlay.open(movie).await });
        true
    }

    pub fn close(&self) {
        self.overlay.close();
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn results(&self) -> &ResultList {
        &self.results
    }

    pub fn trending(&self) -> &TrendingPanel {
        &self.trending
    }

    pub fn overlay(&self) -> &DetailOverlay {
        &self.overlay
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn view(&self) -> SessionView {
        let results = self.results.snapshot();
        SessionView {
            id: self.id,
            revision: self.changes.revision(),
            term: self.search.term(),
            query: self.search.effective(),
            can_load_more: results.can_load_more(),
            results,
            trending: self.trending.state(),
            hero: self.trending.hero(),
            overlay: self.overlay.state(),
        }
    }

    fn find_movie(&self, movie_id: i64) -> Option<MovieSummary> {
        self.results
            .snapshot()
            .movies
            .into_iter()
            .find(|m| m.id == movie_id)
            .or_else(|| {
                self.trending
                    .movies()
                    .into_iter()
                    .find(|m| m.id == movie_id)
            })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}

/// Reload page 1 for the initial query and on every effective-query change
async fn drive_results(
    session: Uuid,
    mut queries: watch::Receiver<String>,
    results: Arc<ResultList>,
) {
    loop {
        let query = queries.borrow_and_update().clone();
        debug!("Session {} effective query: '{}'", session, query);

        let token = results.begin_first_page(&query);
        let list = Arc::clone(&results);
        tokio::spawn(async move { list.finish_first_page(token, &query).await });

        if queries.changed().await.is_err() {
            break;
        }
    }
}
