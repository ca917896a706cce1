// SPDX-License-Identifier: MPL-2.0

//! Debounced user search.
//!
//! Keystrokes reset a quiet-period timer; only when it elapses does a lookup
//! go out. Every scheduled lookup is stamped with a generation number and a
//! response is applied only if its generation is still the latest, so a slow
//! answer for "al" can never overwrite the results for "ali".

use crate::api::{SocialApi, User};
use crate::config::{MIN_QUERY_CHARS, SEARCH_DEBOUNCE, SEARCH_LIMIT};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Renderer-visible state of the search box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<User>,
    pub is_open: bool,
    pub loading: bool,
    /// Set by explicit submits (search page), cleared by short queries.
    pub has_searched: bool,
    generation: u64,
}

impl SearchState {
    fn reset_results(&mut self) {
        self.results.clear();
        self.is_open = false;
        self.loading = false;
    }
}

pub struct SearchController {
    api: Arc<dyn SocialApi>,
    state: Arc<Mutex<SearchState>>,
    pending: Option<JoinHandle<()>>,
    quiet_period: Duration,
    limit: u32,
}

impl SearchController {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(SearchState::default())),
            pending: None,
            quiet_period: SEARCH_DEBOUNCE,
            limit: SEARCH_LIMIT,
        }
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn state(&self) -> SearchState {
        self.state.lock().clone()
    }

    /// Handle a change of the input text. Must be called from within a Tokio
    /// runtime.
    pub fn on_input(&mut self, text: &str) {
        self.cancel_timer();

        let trimmed = text.trim().to_string();
        let generation = {
            let mut state = self.state.lock();
            state.query = text.to_string();
            state.generation += 1;

            if trimmed.chars().count() < MIN_QUERY_CHARS {
                state.reset_results();
                return;
            }

            state.loading = true;
            state.generation
        };

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let quiet_period = self.quiet_period;
        let limit = self.limit;

        // The timer only spawns the lookup; cancelling the timer never
        // cancels a request that is already on the wire.
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            tokio::spawn(run_lookup(api, state, generation, trimmed, limit));
        }));
    }

    /// Immediate, non-debounced search (the search page's submit button).
    pub async fn submit(&mut self, text: &str) {
        self.cancel_timer();

        let trimmed = text.trim().to_string();
        let generation = {
            let mut state = self.state.lock();
            state.query = text.to_string();
            state.generation += 1;

            if trimmed.chars().count() < MIN_QUERY_CHARS {
                state.reset_results();
                state.has_searched = false;
                return;
            }

            state.loading = true;
            state.has_searched = true;
            state.generation
        };

        run_lookup(
            Arc::clone(&self.api),
            Arc::clone(&self.state),
            generation,
            trimmed,
            self.limit,
        )
        .await;
    }

    /// Re-open the results panel when the box regains focus.
    pub fn focus(&self) {
        let mut state = self.state.lock();
        if state.query.trim().chars().count() >= MIN_QUERY_CHARS {
            state.is_open = true;
        }
    }

    /// Close the panel (click outside) without touching query or results.
    pub fn blur(&self) {
        self.state.lock().is_open = false;
    }

    pub fn clear(&mut self) {
        self.cancel_timer();
        let mut state = self.state.lock();
        state.query.clear();
        state.generation += 1;
        state.reset_results();
    }

    /// A result was picked; the box resets just like `clear`.
    pub fn select_result(&mut self) {
        self.clear();
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_timer();
        self.state.lock().generation += 1;
    }
}

async fn run_lookup(
    api: Arc<dyn SocialApi>,
    state: Arc<Mutex<SearchState>>,
    generation: u64,
    query: String,
    limit: u32,
) {
    debug!(%query, generation, "searching users");
    let result = api.search_users(&query, limit).await;

    let mut state = state.lock();
    if state.generation != generation {
        debug!(%query, generation, "discarding stale search response");
        return;
    }

    state.loading = false;
    match result {
        Ok(users) => {
            state.results = users;
            state.is_open = true;
        }
        Err(e) => {
            warn!(%query, "user search failed: {e}");
            state.results.clear();
        }
    }
}
