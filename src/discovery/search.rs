use super::{Changes, Debouncer};
use parking_lot::RwLock;
use std::time::Duration;
use tokio::sync::watch;

/// Default quiet period before a typed term becomes the effective query
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Free-text search box with a debounced effective query
pub struct SearchController {
    term: RwLock<String>,
    debouncer: Debouncer<String>,
    changes: Changes,
}

impl SearchController {
    pub fn new(delay: Duration, changes: Changes) -> Self {
        Self {
            term: RwLock::new(String::new()),
            debouncer: Debouncer::new(String::new(), delay),
            changes,
        }
    }

    /// Accept raw input; the effective query follows after the quiet period
    pub fn input(&self, term: impl Into<String>) {
        let term = term.into();
        *self.term.write() = term.clone();
        self.debouncer.push(term);
        self.changes.bump();
    }

    /// Raw term as typed
    pub fn term(&self) -> String {
        self.term.read().clone()
    }

    /// Last committed query
    pub fn effective(&self) -> String {
        self.debouncer.current()
    }

    /// Receiver that wakes on every effective-query change
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.debouncer.subscribe()
    }
}
