//! Playground configuration
//!
//! Stored in `~/.config/highlight-playground/config.yaml`. Every field is
//! optional; a missing or broken file falls back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::syntax::{describe_query_error, HighlightQuery, Palette, SyntaxEngine, RUST_HIGHLIGHTS};

/// Configuration read once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Delay before re-highlighting after an edit or scroll
    pub highlight_debounce_ms: u64,
    /// Delay before persisting the buffer after an edit
    pub persist_debounce_ms: u64,
    /// Rows shown by the terminal front end
    pub viewport_rows: usize,
    /// Highlight query file replacing the bundled one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_path: Option<PathBuf>,
    /// Colour names replacing the default palette
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub palette: Vec<String>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            highlight_debounce_ms: 50,
            persist_debounce_ms: 2000,
            viewport_rows: 40,
            query_path: None,
            palette: Vec::new(),
        }
    }
}

impl PlaygroundConfig {
    /// Load config from the default location, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, or return defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_debounce_ms)
    }

    pub fn persist_delay(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn palette(&self) -> Palette {
        Palette::new(self.palette.clone())
    }

    /// Compile the highlight query for `engine`'s grammar.
    ///
    /// Uses `query_path` when set. Any failure here is fatal for the
    /// pipeline, so it is reported with the offending query line.
    pub fn compile_query(&self, engine: &SyntaxEngine) -> Result<HighlightQuery> {
        let source = match &self.query_path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read query file {}", path.display()))?,
            None => RUST_HIGHLIGHTS.to_string(),
        };
        HighlightQuery::new(engine.language(), &source)
            .map_err(|e| anyhow::anyhow!(describe_query_error(&source, &e)))
    }
}
