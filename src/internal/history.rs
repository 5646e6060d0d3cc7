use anyhow::{Context, Result};
use jiff::Zoned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const MAX_READ_HISTORY: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadStory {
    pub id: u32,
    pub read_at: Zoned,
}

/// Which stories the user has already opened, newest first, capped at
/// [`MAX_READ_HISTORY`] entries and persisted as a JSON snapshot
/// (last write wins).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReadHistory {
    pub stories: Vec<ReadStory>,
    #[serde(skip)]
    file_path: Option<PathBuf>,
    #[serde(skip)]
    max_size: usize,
}

impl ReadHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            stories: Vec::new(),
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

        let file_path = config_dir.join("read_history.json");

        match file_path.exists() {
            true => {
                let content =
                    fs::read_to_string(&file_path).context("Failed to read history file")?;
                let mut history: ReadHistory =
                    serde_json::from_str(&content).context("Failed to parse history file")?;
                history.file_path = Some(file_path);
                history.max_size = max_size;
                Ok(history)
            }
            false => Ok(Self {
                stories: Vec::new(),
                file_path: Some(file_path),
                max_size,
            }),
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.file_path {
            let content =
                serde_json::to_string_pretty(self).context("Failed to serialize history")?;
            fs::write(path, content).context("Failed to write history file")?;
        }
        Ok(())
    }

    pub fn is_read(&self, id: u32) -> bool {
        self.stories.iter().any(|s| s.id == id)
    }

    /// Mark a story read: move an existing entry to the top, or insert a
    /// new one, then enforce the cap.
    pub fn mark_read(&mut self, id: u32) {
        self.stories.retain(|s| s.id != id);

        self.stories.insert(
            0,
            ReadStory {
                id,
                read_at: Zoned::now(),
            },
        );

        if self.stories.len() > self.max_size {
            self.stories.truncate(self.max_size);
        }
    }

    /// Union ids fetched from the sync backend into the local set; the
    /// caller persists the merged snapshot afterwards.
    pub fn merge_remote(&mut self, ids: Vec<u32>) {
        for id in ids {
            if !self.is_read(id) {
                self.stories.push(ReadStory {
                    id,
                    read_at: Zoned::now(),
                });
            }
        }
        if self.stories.len() > self.max_size {
            self.stories.truncate(self.max_size);
        }
    }

    pub fn clear(&mut self) {
        self.stories.clear();
    }
}
