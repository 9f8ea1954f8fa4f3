//! Per-visitor interface state.
//!
//! Each controller owns one piece of the discovery screen and bumps a shared
//! [`Changes`] revision whenever its state moves, so renderers can follow a
//! session by watching a single counter.

mod debounce;
mod overlay;
mod results;
mod search;
mod session;
mod store;
mod trending;


pub use debounce::Debouncer;
pub use overlay::{DetailOverlay, OverlayState};
pub use results::{GENERIC_FETCH_ERROR, ListPhase, ListState, ResultList};
pub use search::SearchController;
pub use session::{DiscoveryOptions, Session, SessionView};
pub use store::{SessionStore, StoreStats};
pub use trending::{Hero, TrendingPanel, TrendingState};

use std::sync::Arc;
use tokio::sync::watch;

/// Shared revision counter for one session
#[derive(Clone)]
pub struct Changes {
    tx: Arc<watch::Sender<u64>>,
}

impl Changes {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Signal that some state changed
    pub fn bump(&self) {
        self.tx.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    pub fn revision(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for Changes {
    fn default() -> Self {
        Self::new()
    }
}
