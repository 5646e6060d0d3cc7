pub mod comments;
pub mod search;

use crate::internal::cache::Cache;
use crate::internal::models::{Comment, Story, User};
use anyhow::{Context, Result};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use strum_macros::Display;

/// Types of Hacker News feeds we can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FeedType {
    Top,
    New,
    Best,
    Ask,
    Show,
    Job,
}

impl FeedType {
    fn as_api_str(&self) -> &str {
        match self {
            Self::Top => "topstories",
            Self::New => "newstories",
            Self::Best => "beststories",
            Self::Ask => "askstories",
            Self::Show => "showstories",
            Self::Job => "jobstories",
        }
    }
}

pub const HN_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const ITEM_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Transient-failure retry policy: bounded attempts on a fixed status
/// allowlist, nothing else.
const RETRY_LIMIT: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

fn is_transient(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
}

/// HTTP client for the Hacker News item API.
///
/// All fetches go through per-kind TTL caches, and errors carry
/// `anyhow` context instead of being erased into plain strings. The
/// `get_*` wrappers additionally downgrade leaf failures to `None` so a
/// single bad item never aborts a concurrent batch.
#[derive(Clone)]
pub struct HnClient {
    client: Client,
    base_url: String,
    ids_cache: Cache<FeedType, Vec<u32>>,
    story_cache: Cache<u32, Story>,
    comment_cache: Cache<u32, Comment>,
    user_cache: Cache<String, User>,
}

impl HnClient {
    /// Create a new `HnClient` against the public API.
    pub fn new() -> Self {
        Self::with_base_url(HN_API_BASE_URL.to_string())
    }

    /// Create a client against a custom base URL (trailing slash expected).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            ids_cache: Cache::new(ITEM_CACHE_TTL),
            story_cache: Cache::new(ITEM_CACHE_TTL),
            comment_cache: Cache::new(ITEM_CACHE_TTL),
            user_cache: Cache::new(ITEM_CACHE_TTL),
        }
    }

    /// Generic helper to GET a URL and deserialize the JSON body into `T`,
    /// retrying transient failures a bounded number of times.
    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt: u32 = 0;
        loop {
            match self.client.get(url).timeout(REQUEST_TIMEOUT).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if is_transient(status) && attempt < RETRY_LIMIT {
                        attempt += 1;
                        tracing::debug!(%url, %status, attempt, "retrying transient response");
                        tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                        continue;
                    }
                    return resp
                        .json::<T>()
                        .await
                        .with_context(|| format!("failed to parse JSON response from {url}"));
                }
                Err(err) => {
                    if attempt < RETRY_LIMIT && (err.is_timeout() || err.is_connect()) {
                        attempt += 1;
                        tracing::debug!(%url, error = %err, attempt, "retrying failed request");
                        tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                        continue;
                    }
                    return Err(err)
                        .with_context(|| format!("failed to send GET request to {url}"));
                }
            }
        }
    }

    /// Fetch the ordered story-id list for a feed.
    ///
    /// `force_fresh` bypasses the cache in both directions: no read before
    /// the request, no write after it. The freshness poller relies on this
    /// to diff against what the view currently shows.
    pub async fn fetch_feed_ids(&self, feed: FeedType, force_fresh: bool) -> Result<Vec<u32>> {
        if !force_fresh && let Some(ids) = self.ids_cache.get(&feed) {
            return Ok(ids);
        }

        let url = format!("{}{}.json", self.base_url, feed.as_api_str());
        let ids: Vec<u32> = self
            .get_json(&url)
            .await
            .with_context(|| format!("fetch_feed_ids failed for feed {feed:?}"))?;

        if !force_fresh {
            self.ids_cache.set(feed, ids.clone());
        }
        Ok(ids)
    }

    /// Fetch a single story by id. `None` means the id does not resolve to
    /// an item (the API returns a literal `null` body).
    pub async fn fetch_story(&self, id: u32) -> Result<Option<Story>> {
        if let Some(story) = self.story_cache.get(&id) {
            return Ok(Some(story));
        }

        let url = format!("{}item/{}.json", self.base_url, id);
        let story: Option<Story> = self
            .get_json(&url)
            .await
            .with_context(|| format!("fetch_story failed for id {id}"))?;

        if let Some(story) = &story {
            self.story_cache.set(id, story.clone());
        }
        Ok(story)
    }

    /// Fetch a single comment by id.
    pub async fn fetch_comment(&self, id: u32) -> Result<Option<Comment>> {
        if let Some(comment) = self.comment_cache.get(&id) {
            return Ok(Some(comment));
        }

        let url = format!("{}item/{}.json", self.base_url, id);
        let comment: Option<Comment> = self
            .get_json(&url)
            .await
            .with_context(|| format!("fetch_comment failed for id {id}"))?;

        if let Some(comment) = &comment {
            self.comment_cache.set(id, comment.clone());
        }
        Ok(comment)
    }

    /// Fetch a user profile by name.
    pub async fn fetch_user(&self, name: &str) -> Result<Option<User>> {
        if let Some(user) = self.user_cache.get(&name.to_string()) {
            return Ok(Some(user));
        }

        let url = format!("{}user/{}.json", self.base_url, name);
        let user: Option<User> = self
            .get_json(&url)
            .await
            .with_context(|| format!("fetch_user failed for {name}"))?;

        if let Some(user) = &user {
            self.user_cache.set(name.to_string(), user.clone());
        }
        Ok(user)
    }

    /// Like `fetch_story`, but a failure is logged and reported as absence.
    /// Used inside concurrent batches where one bad item must not take the
    /// page down with it.
    pub async fn get_story(&self, id: u32) -> Option<Story> {
        match self.fetch_story(id).await {
            Ok(story) => story,
            Err(err) => {
                tracing::warn!(id, error = %err, "failed to fetch story");
                None
            }
        }
    }

    /// Like `fetch_comment`, but a failure is logged and reported as absence.
    pub async fn get_comment(&self, id: u32) -> Option<Comment> {
        match self.fetch_comment(id).await {
            Ok(comment) => comment,
            Err(err) => {
                tracing::warn!(id, error = %err, "failed to fetch comment");
                None
            }
        }
    }

    /// Fetch one page of a feed: slice the id list, fan out one request per
    /// id, then drop tombstoned items. Sibling order follows the feed list.
    pub async fn get_stories(
        &self,
        feed: FeedType,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Story>> {
        let ids = self.fetch_feed_ids(feed, false).await?;
        let page: Vec<u32> = ids.iter().skip(offset).take(limit).copied().collect();

        let stories = join_all(page.iter().map(|id| self.get_story(*id))).await;

        Ok(stories
            .into_iter()
            .flatten()
            .filter(|story| !story.is_tombstone())
            .collect())
    }
}

impl Default for HnClient {
    fn default() -> Self {
        Self::new()
    }
}
