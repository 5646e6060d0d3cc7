use anyhow::{Context, Result};
use jiff::Zoned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::models::Story;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkedStory {
    pub id: u32,
    pub title: String,
    pub url: Option<String>,
    pub bookmarked_at: Zoned,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Bookmarks {
    pub stories: Vec<BookmarkedStory>,
    #[serde(skip)]
    file_path: Option<PathBuf>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self {
            stories: Vec::new(),
            file_path: None,
        }
    }

    pub fn load_or_create() -> Result<Self> {
        // Resolve the OS-specific config directory and append our app folder.
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("hn-reader");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
        }

        let file_path = config_dir.join("bookmarks.json");

        match file_path.exists() {
            true => {
                let content =
                    fs::read_to_string(&file_path).context("Failed to read bookmarks file")?;
                let mut bookmarks: Bookmarks =
                    serde_json::from_str(&content).context("Failed to parse bookmarks file")?;
                bookmarks.file_path = Some(file_path.clone());
                info!(bookmarks_file = %file_path.display(), count = bookmarks.stories.len(), "Loaded bookmarks");
                Ok(bookmarks)
            }
            false => Ok(Self {
                stories: Vec::new(),
                file_path: Some(file_path),
            }),
        }
    }

    pub fn save(&self) -> Result<()> {
        match &self.file_path {
            Some(path) => {
                let content =
                    serde_json::to_string_pretty(self).context("Failed to serialize bookmarks")?;
                fs::write(path, content).context("Failed to write bookmarks file")?;
            }
            None => {
                info!("Bookmarks.save() called but no file_path is set; skipping write");
            }
        }
        Ok(())
    }

    pub fn add(&mut self, story: &Story) {
        if !self.contains(story.id) {
            let bookmarked = BookmarkedStory {
                id: story.id,
                title: story.title.clone().unwrap_or_default(),
                url: story.url.clone(),
                bookmarked_at: Zoned::now(),
            };
            // Add to beginning of list (newest first)
            self.stories.insert(0, bookmarked);
        }
    }

    pub fn remove(&mut self, id: u32) {
        self.stories.retain(|s| s.id != id);
    }

    pub fn contains(&self, id: u32) -> bool {
        self.stories.iter().any(|s| s.id == id)
    }

    pub fn toggle(&mut self, story: &Story) {
        match self.contains(story.id) {
            true => self.remove(story.id),
            false => self.add(story),
        }
    }

    /// Union entries fetched from the sync backend into the local set,
    /// then re-sort newest first. Local entries win on id collision; the
    /// caller persists the merged snapshot afterwards (remote load, local
    /// overwrite).
    pub fn merge_remote(&mut self, remote: Vec<BookmarkedStory>) {
        for entry in remote {
            if !self.contains(entry.id) {
                self.stories.push(entry);
            }
        }
        self.stories
            .sort_by(|a, b| b.bookmarked_at.timestamp().cmp(&a.bookmarked_at.timestamp()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u32, title: &str) -> Story {
        Story {
            id,
            title: Some(title.to_string()),
            url: Some("https://example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_remove_bookmark() {
        let mut bookmarks = Bookmarks::new();
        let story = story(1, "Test Story");

        bookmarks.add(&story);
        assert!(bookmarks.contains(1));
        assert_eq!(bookmarks.stories.len(), 1);
        assert_eq!(bookmarks.stories[0].title, "Test Story");

        // Adding again is a no-op.
        bookmarks.add(&story);
        assert_eq!(bookmarks.stories.len(), 1);

        bookmarks.remove(1);
        assert!(!bookmarks.contains(1));
        assert!(bookmarks.stories.is_empty());
    }

    #[test]
    fn test_toggle_bookmark() {
        let mut bookmarks = Bookmarks::new();
        let story = story(2, "Toggle Story");

        bookmarks.toggle(&story);
        assert!(bookmarks.contains(2));

        bookmarks.toggle(&story);
        assert!(!bookmarks.contains(2));
    }

    #[test]
    fn test_merge_remote_unions_without_duplicates() {
        let mut bookmarks = Bookmarks::new();
        bookmarks.add(&story(1, "Local"));

        let remote = vec![
            BookmarkedStory {
                id: 1,
                title: "Remote copy of local".to_string(),
                url: None,
                bookmarked_at: Zoned::now(),
            },
            BookmarkedStory {
                id: 2,
                title: "Remote only".to_string(),
                url: None,
                bookmarked_at: Zoned::now(),
            },
        ];

        bookmarks.merge_remote(remote);

        assert_eq!(bookmarks.stories.len(), 2);
        assert!(bookmarks.contains(1));
        assert!(bookmarks.contains(2));
        // The local entry survived the collision.
        let local = bookmarks.stories.iter().find(|s| s.id == 1).unwrap();
        assert_eq!(local.title, "Local");
    }
}
