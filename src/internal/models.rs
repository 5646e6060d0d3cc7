use serde::Deserialize;

/// A story-like item from the HN API (stories, jobs and polls share this
/// shape; jobs simply have no `descendants`).
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Story {
    pub id: u32,
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub by: Option<String>,
    pub score: Option<u32>,
    pub time: Option<i64>,
    pub descendants: Option<u32>,
    pub kids: Option<Vec<u32>>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
}

impl Story {
    /// Deleted or dead items exist in the API but must be excluded from
    /// every listing and traversal.
    pub fn is_tombstone(&self) -> bool {
        self.deleted || self.dead
    }

    pub fn comment_ids(&self) -> Vec<u32> {
        self.kids.clone().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Comment {
    pub id: u32,
    pub by: Option<String>,
    /// Raw HTML as returned by the API.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub parent: Option<u32>,
    #[serde(default)]
    pub time: Option<i64>,
    pub kids: Option<Vec<u32>>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
}

impl Comment {
    pub fn is_tombstone(&self) -> bool {
        self.deleted || self.dead
    }

    /// Direct reply ids in source order; empty when the comment has no kids.
    pub fn reply_ids(&self) -> Vec<u32> {
        self.kids.clone().unwrap_or_default()
    }
}

/// HN users are keyed by name, not numeric id.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct User {
    pub id: String,
    pub created: Option<i64>,
    pub karma: Option<i64>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub submitted: Option<Vec<u32>>,
}
