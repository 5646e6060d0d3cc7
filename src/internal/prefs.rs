//! Theme and density preferences, persisted as a JSON snapshot.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl Theme {
    /// Resolve `System` against the environment's dark-mode signal.
    pub fn resolve(&self, system_prefers_dark: bool) -> ResolvedTheme {
        match self {
            Self::Light => ResolvedTheme::Light,
            Self::Dark => ResolvedTheme::Dark,
            Self::System => {
                if system_prefers_dark {
                    ResolvedTheme::Dark
                } else {
                    ResolvedTheme::Light
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    Comfortable,
    Compact,
}

impl Density {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Comfortable => Self::Compact,
            Self::Compact => Self::Comfortable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub density: Density,
    #[serde(skip)]
    file_path: Option<PathBuf>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_or_create() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("hn-reader");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        let file_path = config_dir.join("prefs.json");

        match file_path.exists() {
            true => {
                let content =
                    fs::read_to_string(&file_path).context("Failed to read prefs file")?;
                let mut prefs: Preferences =
                    serde_json::from_str(&content).context("Failed to parse prefs file")?;
                prefs.file_path = Some(file_path);
                Ok(prefs)
            }
            false => Ok(Self {
                file_path: Some(file_path),
                ..Default::default()
            }),
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.file_path {
            let content =
                serde_json::to_string_pretty(self).context("Failed to serialize prefs")?;
            fs::write(path, content).context("Failed to write prefs file")?;
        }
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Flip to the opposite of the currently resolved theme. Toggling away
    /// from `System` pins an explicit choice.
    pub fn toggle_theme(&mut self, system_prefers_dark: bool) {
        self.theme = match self.theme.resolve(system_prefers_dark) {
            ResolvedTheme::Light => Theme::Dark,
            ResolvedTheme::Dark => Theme::Light,
        };
    }

    pub fn toggle_density(&mut self) {
        self.density = self.density.toggle();
    }
}
