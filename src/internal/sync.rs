//! Thin client for the optional account-sync backend.
//!
//! Row-level CRUD over `profiles`, `bookmarks` and `read_stories`,
//! gated by an upfront configuration check: without credentials every
//! call short-circuits to a no-op and the app stays local-only. Writes
//! are fire-and-forget; failures are logged, never propagated.

use jiff::Zoned;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::bookmarks::BookmarkedStory;
use crate::config::SyncConfig;

const SYNC_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteBookmark {
    story_id: String,
    #[serde(default)]
    story_title: Option<String>,
    #[serde(default)]
    story_url: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteReadStory {
    story_id: String,
}

#[derive(Debug, Clone)]
struct SyncCredentials {
    base_url: String,
    anon_key: String,
}

/// PostgREST-style client. Holds `None` when the backend is not
/// configured.
#[derive(Clone)]
pub struct SyncClient {
    http: Client,
    creds: Option<SyncCredentials>,
}

impl SyncClient {
    pub fn new(config: &SyncConfig) -> Self {
        let creds = match (&config.url, &config.anon_key) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => {
                Some(SyncCredentials {
                    base_url: url.trim_end_matches('/').to_string(),
                    anon_key: key.clone(),
                })
            }
            _ => None,
        };
        Self {
            http: Client::new(),
            creds,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.creds.is_some()
    }

    fn request(&self, method: reqwest::Method, table: &str) -> Option<reqwest::RequestBuilder> {
        let creds = self.creds.as_ref()?;
        let url = format!("{}/rest/v1/{}", creds.base_url, table);
        Some(
            self.http
                .request(method, url)
                .header("apikey", &creds.anon_key)
                .bearer_auth(&creds.anon_key)
                .timeout(SYNC_TIMEOUT),
        )
    }

    pub async fn fetch_profile(&self, user_id: &str) -> Option<Profile> {
        let req = self.request(reqwest::Method::GET, "profiles")?;
        let result = req
            .query(&[("id", format!("eq.{user_id}")), ("limit", "1".to_string())])
            .send()
            .await;
        match result {
            Ok(resp) => match resp.json::<Vec<Profile>>().await {
                Ok(mut profiles) => profiles.pop(),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to parse profile response");
                    None
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch profile");
                None
            }
        }
    }

    /// Fetch the user's bookmarks, newest first. Unconfigured or failing
    /// backends yield an empty list; the caller merges whatever arrives.
    pub async fn fetch_bookmarks(&self, user_id: &str) -> Vec<BookmarkedStory> {
        let Some(req) = self.request(reqwest::Method::GET, "bookmarks") else {
            return Vec::new();
        };
        let result = req
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await;

        let rows: Vec<RemoteBookmark> = match result {
            Ok(resp) => match resp.json().await {
                Ok(rows) => rows,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to parse bookmarks response");
                    return Vec::new();
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch bookmarks");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| {
                let id = row.story_id.parse::<u32>().ok()?;
                let bookmarked_at = row
                    .created_at
                    .as_deref()
                    .and_then(|ts| ts.parse::<jiff::Timestamp>().ok())
                    .map(|ts| ts.to_zoned(jiff::tz::TimeZone::system()))
                    .unwrap_or_else(Zoned::now);
                Some(BookmarkedStory {
                    id,
                    title: row.story_title.unwrap_or_default(),
                    url: row.story_url,
                    bookmarked_at,
                })
            })
            .collect()
    }

    pub async fn add_bookmark(&self, user_id: &str, story: &BookmarkedStory) {
        let Some(req) = self.request(reqwest::Method::POST, "bookmarks") else {
            return;
        };
        let body = serde_json::json!({
            "user_id": user_id,
            "story_id": story.id.to_string(),
            "story_title": story.title,
            "story_url": story.url,
        });
        if let Err(err) = req.json(&body).send().await {
            tracing::warn!(error = %err, story_id = story.id, "failed to add bookmark remotely");
        }
    }

    pub async fn remove_bookmark(&self, user_id: &str, story_id: u32) {
        let Some(req) = self.request(reqwest::Method::DELETE, "bookmarks") else {
            return;
        };
        let result = req
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("story_id", format!("eq.{story_id}")),
            ])
            .send()
            .await;
        if let Err(err) = result {
            tracing::warn!(error = %err, story_id, "failed to remove bookmark remotely");
        }
    }

    /// Fetch the newest read-story ids, bounded to what the local store
    /// keeps anyway.
    pub async fn fetch_read_ids(&self, user_id: &str, limit: usize) -> Vec<u32> {
        let Some(req) = self.request(reqwest::Method::GET, "read_stories") else {
            return Vec::new();
        };
        let result = req
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("order", "read_at.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await;

        let rows: Vec<RemoteReadStory> = match result {
            Ok(resp) => match resp.json().await {
                Ok(rows) => rows,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to parse read stories response");
                    return Vec::new();
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch read stories");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| row.story_id.parse().ok())
            .collect()
    }

    pub async fn mark_read(&self, user_id: &str, story_id: u32) {
        let Some(req) = self.request(reqwest::Method::POST, "read_stories") else {
            return;
        };
        let body = serde_json::json!({
            "user_id": user_id,
            "story_id": story_id.to_string(),
        });
        let result = req
            .header("Prefer", "resolution=merge-duplicates")
            .json(&body)
            .send()
            .await;
        if let Err(err) = result {
            tracing::warn!(error = %err, story_id, "failed to mark story read remotely");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_client_short_circuits() {
        let client = SyncClient::new(&SyncConfig::default());
        assert!(!client.is_configured());

        let client = SyncClient::new(&SyncConfig {
            url: Some("".to_string()),
            anon_key: Some("key".to_string()),
        });
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_fetches_yield_empty() {
        let client = SyncClient::new(&SyncConfig::default());
        assert!(client.fetch_bookmarks("user").await.is_empty());
        assert!(client.fetch_read_ids("user", 500).await.is_empty());
        assert!(client.fetch_profile("user").await.is_none());
        // Writes are silent no-ops.
        client.mark_read("user", 1).await;
    }

    #[tokio::test]
    async fn test_fetch_bookmarks_parses_rows() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/bookmarks")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"story_id": "101", "story_title": "Synced", "story_url": null,
                     "created_at": "2026-01-15T10:00:00Z"},
                    {"story_id": "not-a-number", "story_title": "Bad row"}
                ]"#,
            )
            .create_async()
            .await;

        let client = SyncClient::new(&SyncConfig {
            url: Some(server.url()),
            anon_key: Some("anon".to_string()),
        });
        assert!(client.is_configured());

        let bookmarks = client.fetch_bookmarks("user").await;
        // The unparseable row is dropped, not fatal.
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].id, 101);
        assert_eq!(bookmarks[0].title, "Synced");
    }

    #[tokio::test]
    async fn test_backend_failure_degrades_to_empty() {
        let client = SyncClient::new(&SyncConfig {
            url: Some("http://127.0.0.1:1".to_string()),
            anon_key: Some("anon".to_string()),
        });
        assert!(client.fetch_bookmarks("user").await.is_empty());
        assert!(client.fetch_read_ids("user", 500).await.is_empty());
    }
}
