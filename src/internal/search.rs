//! Search state: overlapping-request arbitration and recent-search
//! persistence. The HTTP side lives in `crate::api::search`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::search::{SearchClient, SearchFilters, SearchHit, SearchResponse};

pub const MAX_RECENT_SEARCHES: usize = 10;

const SEARCH_FAILED_MESSAGE: &str = "Search failed. Please try again.";

/// Recent search terms, newest first, capped and persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecentSearches {
    pub queries: Vec<String>,
    #[serde(skip)]
    file_path: Option<PathBuf>,
    #[serde(skip)]
    max_size: usize,
}

impl RecentSearches {
    pub fn new(max_size: usize) -> Self {
        Self {
            queries: Vec::new(),
            file_path: None,
            max_size,
        }
    }

    pub fn load_or_create(max_size: usize) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("hn-reader");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        let file_path = config_dir.join("recent_searches.json");

        match file_path.exists() {
            true => {
                let content = fs::read_to_string(&file_path)
                    .context("Failed to read recent searches file")?;
                let mut recent: RecentSearches = serde_json::from_str(&content)
                    .context("Failed to parse recent searches file")?;
                recent.file_path = Some(file_path);
                recent.max_size = max_size;
                Ok(recent)
            }
            false => Ok(Self {
                queries: Vec::new(),
                file_path: Some(file_path),
                max_size,
            }),
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.file_path {
            let content = serde_json::to_string_pretty(self)
                .context("Failed to serialize recent searches")?;
            fs::write(path, content).context("Failed to write recent searches file")?;
        }
        Ok(())
    }

    /// Record a term: trimmed, moved to the top if already present, list
    /// truncated to the cap.
    pub fn add(&mut self, term: &str) {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return;
        }

        self.queries.retain(|q| q != trimmed);
        self.queries.insert(0, trimmed.to_string());

        if self.queries.len() > self.max_size {
            self.queries.truncate(self.max_size);
        }
    }

    pub fn clear(&mut self) {
        self.queries.clear();
    }

    pub fn get_recent(&self, index: usize) -> Option<&String> {
        self.queries.get(index)
    }
}

/// One search panel's worth of state.
///
/// Overlapping requests are arbitrated with a monotonically increasing
/// token: starting a request invalidates every earlier one, and a
/// completion carrying a stale token is discarded unconditionally.
/// Last-issued wins, not last-to-complete.
#[derive(Debug, Default)]
pub struct SearchSession {
    pub query: String,
    pub filters: SearchFilters,
    pub results: Vec<SearchHit>,
    pub total_hits: u64,
    pub loading: bool,
    pub error: Option<String>,
    request_seq: u64,
    recent: RecentSearches,
}

impl SearchSession {
    pub fn new(recent: RecentSearches) -> Self {
        Self {
            recent,
            ..Default::default()
        }
    }

    /// Reset for a freshly opened search panel.
    pub fn open(&mut self) {
        self.query.clear();
        self.results.clear();
        self.total_hits = 0;
        self.error = None;
        self.loading = false;
    }

    /// Start a request and return its token. Everything in flight before
    /// this call is now stale.
    pub fn begin_request(&mut self) -> u64 {
        self.request_seq += 1;
        self.loading = true;
        self.error = None;
        self.request_seq
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.request_seq
    }

    /// Accept a response if its token is still current. Returns whether it
    /// was applied.
    pub fn apply_response(&mut self, token: u64, response: SearchResponse) -> bool {
        if !self.is_current(token) {
            tracing::debug!(token, current = self.request_seq, "discarding stale search response");
            return false;
        }
        self.results = response.hits;
        self.total_hits = response.nb_hits;
        self.loading = false;
        self.error = None;
        true
    }

    /// Record a failure if its token is still current. The session
    /// degrades to an empty result with a generic message; nothing
    /// propagates.
    pub fn apply_failure(&mut self, token: u64) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.results.clear();
        self.total_hits = 0;
        self.loading = false;
        self.error = Some(SEARCH_FAILED_MESSAGE.to_string());
        true
    }

    /// Run one search inline: begin, fetch, apply. Spawning callers use
    /// the begin/apply primitives directly instead.
    pub async fn execute(&mut self, client: &SearchClient, page: u32) {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            self.results.clear();
            self.total_hits = 0;
            self.error = None;
            return;
        }

        let filters = self.filters;
        let token = self.begin_request();
        match client.search(&query, &filters, page).await {
            Ok(response) => {
                self.apply_response(token, response);
            }
            Err(err) => {
                tracing::warn!(error = %err, "search request failed");
                self.apply_failure(token);
            }
        }
    }

    /// Commit the current query to the recent list (called on submit, not
    /// on every keystroke).
    pub fn commit(&mut self) {
        let query = self.query.clone();
        self.recent.add(&query);
        if let Err(err) = self.recent.save() {
            tracing::warn!(error = %err, "failed to persist recent searches");
        }
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
        if let Err(err) = self.recent.save() {
            tracing::warn!(error = %err, "failed to persist recent searches");
        }
    }
}
