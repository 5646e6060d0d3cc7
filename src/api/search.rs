//! Full-text search over the HN search API.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const SEARCH_API_BASE_URL: &str = "https://hn.algolia.com/api/v1/";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const HITS_PER_PAGE: u32 = 20;

/// Restrict results to one item kind, expressed as a tags filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    Story,
    Comment,
}

impl SearchScope {
    fn as_tags(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Story => Some("story"),
            Self::Comment => Some("comment"),
        }
    }
}

/// Restrict results to a trailing time window via a numeric filter on the
/// item creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    PastDay,
    PastWeek,
    PastMonth,
    PastYear,
}

impl DateRange {
    fn window_secs(&self) -> Option<u64> {
        match self {
            Self::All => None,
            Self::PastDay => Some(86_400),
            Self::PastWeek => Some(604_800),
            Self::PastMonth => Some(2_592_000),
            Self::PastYear => Some(31_536_000),
        }
    }

    fn numeric_filter(&self, now_secs: u64) -> Option<String> {
        self.window_secs()
            .map(|window| format!("created_at_i>{}", now_secs.saturating_sub(window)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchFilters {
    pub scope: SearchScope,
    pub date_range: DateRange,
    pub sort_by_date: bool,
}

/// One search result. Story hits carry `title`/`url`; comment hits carry
/// `comment_text` plus the enclosing story fields.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchHit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub points: Option<i64>,
    pub num_comments: Option<i64>,
    pub created_at_i: Option<i64>,
    #[serde(default)]
    pub story_text: Option<String>,
    #[serde(default)]
    pub comment_text: Option<String>,
    #[serde(default)]
    pub story_title: Option<String>,
    #[serde(default)]
    pub story_url: Option<String>,
    #[serde(default)]
    pub story_id: Option<u64>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default, rename = "_tags")]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    #[serde(rename = "nbHits")]
    pub nb_hits: u64,
    pub page: u32,
    #[serde(rename = "nbPages")]
    pub nb_pages: u32,
    #[serde(rename = "hitsPerPage")]
    pub hits_per_page: u32,
}

/// HTTP client for the search API. No retry here; a failed search is
/// reported once and the user simply searches again.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new() -> Self {
        Self::with_base_url(SEARCH_API_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Run one search-page request. `sort_by_date` selects the
    /// `search_by_date` endpoint (newest first) over relevance ranking.
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        page: u32,
    ) -> Result<SearchResponse> {
        let endpoint = if filters.sort_by_date {
            "search_by_date"
        } else {
            "search"
        };
        let url = format!("{}{}", self.base_url, endpoint);

        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("hitsPerPage", HITS_PER_PAGE.to_string()),
        ];
        if let Some(tags) = filters.scope.as_tags() {
            params.push(("tags", tags.to_string()));
        }
        if let Some(numeric) = filters.date_range.numeric_filter(now_secs()) {
            params.push(("numericFilters", numeric));
        }

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("failed to send search request to {url}"))?;

        resp.json::<SearchResponse>()
            .await
            .with_context(|| format!("failed to parse search response from {url}"))
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_secs())
        .unwrap_or(0)
}
