//! User configuration handling

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    pub theme: Option<String>,
    /// Author name for new comments; falls back to `$USER`.
    pub user: Option<String>,
    /// Reload the thread after posting instead of appending locally.
    #[serde(default)]
    pub reset_on_save: bool,
    #[serde(default)]
    pub hide_cancel: bool,
    pub height_debounce_ms: Option<u64>,
}

/// Load UI configuration from the user's config directory.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_ui_config() -> anyhow::Result<Option<UiConfig>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    parse_ui_config(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
        .map(Some)
}

/// Parse a config document. Unknown keys are ignored.
///
/// # Errors
///
/// Returns an error if the JSON is malformed.
pub fn parse_ui_config(contents: &str) -> anyhow::Result<UiConfig> {
    Ok(serde_json::from_str(contents)?)
}

/// Save UI configuration to the user's config directory.
///
/// # Errors
///
/// Returns an error if the config directory cannot be created or the file cannot be written.
pub fn save_ui_config(config: &UiConfig) -> anyhow::Result<()> {
    let Some(path) = config_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    Ok(())
}

fn config_path() -> Option<PathBuf> {
    let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else if let Ok(home) = std::env::var("HOME") {
        Path::new(&home).join(".config")
    } else {
        return None;
    };

    Some(base.join(".review-thread").join("ui.json"))
}
