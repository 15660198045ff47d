//! In-process navigation host for tests and non-browser callers.
//!
//! Keeps a fake location and history and records every side effect so
//! callers can assert on what a navigation would have done.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::host::{Delay, NavigationHost, PendingCleanup};
use super::query::{QueryParams, RelativeUrl};

/// Everything a [`MemoryHost`] has seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryState {
    pub path: String,
    pub query: QueryParams,
    pub fragment: Option<String>,
    pub history_length: usize,
    /// Number of `go_back` calls.
    pub back_calls: usize,
    /// URLs passed to `replace_url`, oldest first.
    pub replaced: Vec<String>,
    /// Element ids passed to `scroll_into_view`, oldest first.
    pub scrolled: Vec<String>,
    /// Cleanups queued with `defer` and not yet run.
    pub pending: Vec<(PendingCleanup, Duration)>,
    /// Delays requested through `sleep`, oldest first.
    pub slept: Vec<Duration>,
}

/// A [`NavigationHost`] backed by plain memory.
///
/// `sleep` waits on tokio's timer unless built
/// [`with_instant_delays`](Self::with_instant_delays).
#[derive(Debug)]
pub struct MemoryHost {
    state: Mutex<MemoryState>,
    instant_delays: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// A host sitting at `/` with a single history entry.
    pub fn new() -> Self {
        Self::at("/")
    }

    /// A host sitting at `url` (`path?query#fragment`) with a single history entry.
    pub fn at(url: &str) -> Self {
        let url = RelativeUrl::parse(url);
        Self {
            state: Mutex::new(MemoryState {
                path: url.path,
                query: url.query,
                fragment: url.fragment.filter(|f| !f.is_empty()),
                history_length: 1,
                ..MemoryState::default()
            }),
            instant_delays: false,
        }
    }

    /// Set the history length.
    pub fn with_history(self, len: usize) -> Self {
        self.lock().history_length = len;
        self
    }

    /// Complete every `sleep` immediately, without needing a runtime.
    pub fn with_instant_delays(mut self) -> Self {
        self.instant_delays = true;
        self
    }

    /// A copy of the recorded state.
    pub fn snapshot(&self) -> MemoryState {
        self.lock().clone()
    }

    /// Run every queued cleanup, as a browser would once its timers fire.
    ///
    /// Returns how many ran.
    pub fn run_deferred(&self) -> usize {
        let pending = std::mem::take(&mut self.lock().pending);
        for (cleanup, _) in &pending {
            cleanup.apply(self);
        }
        pending.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NavigationHost for MemoryHost {
    fn current_path(&self) -> String {
        self.lock().path.clone()
    }

    fn current_query(&self) -> QueryParams {
        self.lock().query.clone()
    }

    fn current_fragment(&self) -> Option<String> {
        self.lock().fragment.clone()
    }

    fn replace_url(&self, url: &str) {
        let parsed = RelativeUrl::parse(url);
        let mut state = self.lock();
        state.path = parsed.path;
        state.query = parsed.query;
        state.fragment = parsed.fragment.filter(|f| !f.is_empty());
        state.replaced.push(url.to_owned());
    }

    fn history_length(&self) -> usize {
        self.lock().history_length
    }

    fn go_back(&self) {
        let mut state = self.lock();
        state.back_calls += 1;
        state.history_length = state.history_length.saturating_sub(1).max(1);
    }

    fn scroll_into_view(&self, element_id: &str) {
        self.lock().scrolled.push(element_id.to_owned());
    }

    fn defer(&self, cleanup: PendingCleanup, delay: Duration) {
        self.lock().pending.push((cleanup, delay));
    }

    fn sleep(&self, delay: Duration) -> Delay<'_> {
        self.lock().slept.push(delay);
        if self.instant_delays {
            Box::pin(std::future::ready(()))
        } else {
            Box::pin(tokio::time::sleep(delay))
        }
    }
}
