//! Application configuration for mtextstrip.
//!
//! User config lives at `~/.mtextstrip/mtextstrip.toml`.
//! CLI flags override config file values, which override defaults.
//! The `[strip_formats]` table holds the last-used category selection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StripError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "mtextstrip.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".mtextstrip";

// ---------------------------------------------------------------------------
// Config structs (matching mtextstrip.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Persisted category selection, keyed by single-character code.
    #[serde(default)]
    pub strip_formats: BTreeMap<String, bool>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Pretty-print the drawing JSON when writing it back.
    #[serde(default = "default_true")]
    pub pretty_output: bool,

    /// Keep a `.bak` copy of the drawing before overwriting it in place.
    #[serde(default)]
    pub backup: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pretty_output: true,
            backup: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Stored selection flag for `code`, if one was ever saved.
    pub fn selection_flag(&self, code: char) -> Option<bool> {
        self.strip_formats.get(&code.to_string()).copied()
    }

    /// Record the selection flag for `code`.
    pub fn set_selection_flag(&mut self, code: char, selected: bool) {
        self.strip_formats.insert(code.to_string(), selected);
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.mtextstrip/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| StripError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.mtextstrip/mtextstrip.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the config at `path`, falling back to defaults when it is absent.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| StripError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| StripError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StripError::io(parent, e))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| StripError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| StripError::io(path, e))?;
    tracing::debug!(?path, "saved config file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("pretty_output"));
        assert!(toml_str.contains("backup"));
    }

    #[test]
    fn config_with_selection() {
        let toml_str = r#"
[defaults]
backup = true

[strip_formats]
C = true
F = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.defaults.backup);
        assert!(config.defaults.pretty_output);
        assert_eq!(config.selection_flag('C'), Some(true));
        assert_eq!(config.selection_flag('F'), Some(false));
        assert_eq!(config.selection_flag('H'), None);
    }

    #[test]
    fn selection_flags_are_case_sensitive() {
        let mut config = AppConfig::default();
        config.set_selection_flag('C', true);
        assert_eq!(config.selection_flag('C'), Some(true));
        assert_eq!(config.selection_flag('c'), None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_or_default(&dir.path().join("absent.toml")).expect("load");
        assert!(config.strip_formats.is_empty());
    }

    #[test]
    fn save_then_load_keeps_selection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = AppConfig::default();
        config.set_selection_flag('S', true);
        config.set_selection_flag('K', false);
        save_config_to(&config, &path).expect("save");

        let loaded = load_config_from(&path).expect("load");
        assert_eq!(loaded.selection_flag('S'), Some(true));
        assert_eq!(loaded.selection_flag('K'), Some(false));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[strip_formats\nC = ").expect("write");

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, StripError::Config { .. }));
    }
}
