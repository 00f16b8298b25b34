//! Diff settings
//!
//! Settings live in a `confy` managed file. Each key is read on its own: a
//! key that is missing, has the wrong type or holds an unknown value falls
//! back to its default, and the corrected file is written back.

use crate::constant::{APP_NAME, DEFAULT_CLIPBOARD_FILE_NAME, DEFAULT_SELECTION_FILE_NAME};
use crate::diff::DiffStyle;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown comparison source: {0}")]
pub struct UnknownComparisonSource(pub String);

/// What the selection is diffed against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComparisonSource {
    /// Text captured by the last copy or cut trigger
    #[default]
    StoredBuffer,
    /// Whatever the system clipboard holds right now
    Clipboard,
}

impl ComparisonSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonSource::StoredBuffer => "stored_buffer",
            ComparisonSource::Clipboard => "clipboard",
        }
    }
}

impl fmt::Display for ComparisonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonSource {
    type Err = UnknownComparisonSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stored_buffer" => Ok(ComparisonSource::StoredBuffer),
            "clipboard" => Ok(ComparisonSource::Clipboard),
            other => Err(UnknownComparisonSource(other.to_string())),
        }
    }
}

#[derive(Default)]
pub struct Config {
    pub settings: Settings,
    /// Explicit settings file; `None` means the platform default location
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let stored: StoredSettings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Self::from_stored(stored, None)
    }

    /// Load configuration from a specific file, creating default if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let stored: StoredSettings = confy::load_path(path)?;
        info!("Load config from {:?}", path);
        Self::from_stored(stored, Some(path.to_path_buf()))
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        match &self.path {
            Some(path) => {
                confy::store_path(path, &self.settings)?;
                info!("Save config to {:?}", path);
            }
            None => {
                confy::store(APP_NAME, None, &self.settings)?;
                info!("Save config to {:?}", Self::config_path()?);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    fn from_stored(stored: StoredSettings, path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let (settings, corrected) = stored.resolve();
        let config = Self { settings, path };
        if !corrected.is_empty() {
            info!("Writing back corrected settings: {}", corrected.join(", "));
            config.save()?;
        }
        Ok(config)
    }
}

/// Read a string, treating a value of any other type as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Value::deserialize(deserializer)? {
        Value::Text(text) => Some(text),
        Value::Other(_) => None,
    })
}

/// Settings exactly as found on disk, `None` for absent or mistyped keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipboard_file_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_file_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_against: Option<String>,
}

impl StoredSettings {
    /// Fill in defaults key by key, returning the settings and every key
    /// that had to be filled in or corrected
    pub fn resolve(self) -> (Settings, Vec<&'static str>) {
        let defaults = Settings::default();
        let mut corrected = Vec::new();
        let mut take = |key: &'static str, value: Option<String>, default: String| match value {
            Some(value) => value,
            None => {
                info!("Missing or mistyped {}, using {:?}", key, default);
                corrected.push(key);
                default
            }
        };

        let mut settings = Settings {
            clipboard_file_name: take(
                "clipboard_file_name",
                self.clipboard_file_name,
                defaults.clipboard_file_name,
            ),
            selection_file_name: take(
                "selection_file_name",
                self.selection_file_name,
                defaults.selection_file_name,
            ),
            diff_type: take("diff_type", self.diff_type, defaults.diff_type),
            compare_against: take(
                "compare_against",
                self.compare_against,
                defaults.compare_against,
            ),
        };
        corrected.extend(settings.validate());
        (settings, corrected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredSettings")]
pub struct Settings {
    /// Header label for the side being compared against
    pub clipboard_file_name: String,

    /// Header label for the current selection
    pub selection_file_name: String,

    /// `unified` or `context`
    pub diff_type: String,

    /// `stored_buffer` or `clipboard`
    pub compare_against: String,
}

impl From<StoredSettings> for Settings {
    fn from(stored: StoredSettings) -> Self {
        stored.resolve().0
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clipboard_file_name: DEFAULT_CLIPBOARD_FILE_NAME.to_string(),
            selection_file_name: DEFAULT_SELECTION_FILE_NAME.to_string(),
            diff_type: DiffStyle::default().to_string(),
            compare_against: ComparisonSource::default().to_string(),
        }
    }
}

impl Settings {
    /// Reset invalid values to their defaults, returning the corrected keys
    pub fn validate(&mut self) -> Vec<&'static str> {
        let mut corrected = Vec::new();

        if self.diff_type.parse::<DiffStyle>().is_err() {
            info!(
                "Invalid diff_type {:?}, resetting to {}",
                self.diff_type,
                DiffStyle::default()
            );
            self.diff_type = DiffStyle::default().to_string();
            corrected.push("diff_type");
        }

        if self.compare_against.parse::<ComparisonSource>().is_err() {
            info!(
                "Invalid compare_against {:?}, resetting to {}",
                self.compare_against,
                ComparisonSource::default()
            );
            self.compare_against = ComparisonSource::default().to_string();
            corrected.push("compare_against");
        }

        corrected
    }

    /// Configured diff style, falling back to the default for invalid values
    pub fn diff_style(&self) -> DiffStyle {
        self.diff_type.parse().unwrap_or_default()
    }

    /// Configured comparison source, falling back to the default for invalid values
    pub fn comparison_source(&self) -> ComparisonSource {
        self.compare_against.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use uuid::Uuid;

    fn setup_test_dir() -> PathBuf {
        let test_dir = std::env::temp_dir().join(format!("test_config_{}", Uuid::new_v4()));
        fs::create_dir_all(&test_dir).unwrap();
        test_dir
    }

    fn cleanup_test_dir(test_dir: &Path) {
        let _ = fs::remove_dir_all(test_dir);
    }

    fn stored(json: &str) -> StoredSettings {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.clipboard_file_name, "Clipboard");
        assert_eq!(settings.selection_file_name, "Selection");
        assert_eq!(settings.diff_type, "unified");
        assert_eq!(settings.diff_style(), DiffStyle::Unified);
        assert_eq!(settings.comparison_source(), ComparisonSource::StoredBuffer);
    }

    #[test]
    fn test_missing_diff_type_is_filled_in() {
        let (settings, corrected) = stored(r#"{"clipboard_file_name": "Old"}"#).resolve();
        assert!(corrected.contains(&"diff_type"));
        assert!(!corrected.contains(&"clipboard_file_name"));
        assert_eq!(settings.diff_type, "unified");
        assert_eq!(settings.clipboard_file_name, "Old");
        assert_eq!(settings.selection_file_name, "Selection");
    }

    #[test]
    fn test_mistyped_key_falls_back_alone() {
        let (settings, corrected) = stored(
            r#"{"clipboard_file_name": "Kept", "selection_file_name": "S",
                "diff_type": 5, "compare_against": "clipboard"}"#,
        )
        .resolve();
        assert_eq!(corrected, vec!["diff_type"]);
        assert_eq!(settings.clipboard_file_name, "Kept");
        assert_eq!(settings.diff_type, "unified");
        assert_eq!(settings.comparison_source(), ComparisonSource::Clipboard);
    }

    #[test]
    fn test_settings_deserialize_leniently() {
        let settings: Settings =
            serde_json::from_str(r#"{"clipboard_file_name": "Kept", "diff_type": [1, 2]}"#)
                .unwrap();
        assert_eq!(settings.clipboard_file_name, "Kept");
        assert_eq!(settings.diff_style(), DiffStyle::Unified);
    }

    #[test]
    fn test_bogus_diff_type_is_corrected() {
        let mut settings = Settings {
            diff_type: "bogus".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.validate(), vec!["diff_type"]);
        assert_eq!(settings.diff_type, "unified");
    }

    #[test]
    fn test_context_diff_type_is_kept() {
        let (settings, corrected) = stored(
            r#"{"clipboard_file_name": "C", "selection_file_name": "S",
                "diff_type": "context", "compare_against": "clipboard"}"#,
        )
        .resolve();
        assert!(corrected.is_empty());
        assert_eq!(settings.diff_style(), DiffStyle::Context);
        assert_eq!(settings.comparison_source(), ComparisonSource::Clipboard);
    }

    #[test]
    fn test_bogus_compare_against_is_corrected() {
        let (settings, corrected) = stored(r#"{"compare_against": "history"}"#).resolve();
        assert!(corrected.contains(&"compare_against"));
        assert_eq!(settings.compare_against, "stored_buffer");
        assert_eq!(settings.comparison_source(), ComparisonSource::StoredBuffer);
    }

    #[test]
    fn test_load_corrects_and_persists() {
        let test_dir = setup_test_dir();
        let path = test_dir.join("clipboard-diff.toml");
        fs::write(
            &path,
            "clipboard_file_name = \"CLIPBOARD IS FUN\"\ndiff_type = \"bogus\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.diff_type, "unified");
        assert_eq!(config.settings.clipboard_file_name, "CLIPBOARD IS FUN");

        let stored = fs::read_to_string(&path).unwrap();
        assert!(stored.contains("diff_type = \"unified\""));
        assert!(!stored.contains("bogus"));

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_load_persists_missing_keys() {
        let test_dir = setup_test_dir();
        let path = test_dir.join("clipboard-diff.toml");
        fs::write(&path, "clipboard_file_name = \"Old\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.clipboard_file_name, "Old");
        assert_eq!(config.settings.diff_type, "unified");

        let stored = fs::read_to_string(&path).unwrap();
        assert!(stored.contains("clipboard_file_name = \"Old\""));
        assert!(stored.contains("selection_file_name = \"Selection\""));
        assert!(stored.contains("diff_type = \"unified\""));
        assert!(stored.contains("compare_against = \"stored_buffer\""));

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_load_keeps_other_keys_when_one_is_mistyped() {
        let test_dir = setup_test_dir();
        let path = test_dir.join("clipboard-diff.toml");
        fs::write(&path, "clipboard_file_name = \"Kept\"\ndiff_type = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.clipboard_file_name, "Kept");
        assert_eq!(config.settings.diff_type, "unified");

        let stored = fs::read_to_string(&path).unwrap();
        assert!(stored.contains("clipboard_file_name = \"Kept\""));
        assert!(stored.contains("diff_type = \"unified\""));
        assert!(!stored.contains("diff_type = 5"));

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_complete_file_is_left_alone() {
        let test_dir = setup_test_dir();
        let path = test_dir.join("clipboard-diff.toml");
        let contents = "# mine\n\
                        clipboard_file_name = \"A\"\n\
                        selection_file_name = \"B\"\n\
                        diff_type = \"context\"\n\
                        compare_against = \"stored_buffer\"\n";
        fs::write(&path, contents).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.diff_style(), DiffStyle::Context);
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_load_creates_default_file() {
        let test_dir = setup_test_dir();
        let path = test_dir.join("clipboard-diff.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings, Settings::default());
        let stored = fs::read_to_string(&path).unwrap();
        assert!(stored.contains("diff_type = \"unified\""));

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_save_round_trip() {
        let test_dir = setup_test_dir();
        let path = test_dir.join("clipboard-diff.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.settings.diff_type = "context".to_string();
        config.settings.selection_file_name = "SELECTION IS BETTER".to_string();
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.settings.diff_style(), DiffStyle::Context);
        assert_eq!(reloaded.settings.selection_file_name, "SELECTION IS BETTER");

        cleanup_test_dir(&test_dir);
    }
}
