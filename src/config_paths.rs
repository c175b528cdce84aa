//! Centralized configuration paths for the playground
//!
//! All files live under:
//! - Unix/macOS: `~/.config/highlight-playground/`
//! - Windows: `%APPDATA%\highlight-playground\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

const APP_DIR: &str = "highlight-playground";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/highlight-playground`
///   - Else: `~/.config/highlight-playground`
///
/// Windows:
///   - `%APPDATA%\highlight-playground`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/highlight-playground/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/highlight-playground/state.json`
pub fn state_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("state.json"))
}

/// `~/.config/highlight-playground/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir().context("No config directory available")?;
    ensure_dir(&logs)?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let Some(dir) = config_dir() else {
            return;
        };
        assert!(dir.to_string_lossy().contains(APP_DIR));
        assert!(config_file().unwrap().starts_with(&dir));
        assert!(state_file().unwrap().ends_with("state.json"));
        assert!(logs_dir().unwrap().starts_with(&dir));
    }
}
