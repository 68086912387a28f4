//! Configuration for Wordmark.
//!
//! Stored in `~/.wordmark/config.toml`. Every field is optional; a missing
//! file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::document::DEFAULT_JSON_INDENT;

/// Default watermark secret.
pub const DEFAULT_SECRET: &str = "p@ssw0rd";

/// Default number of characters shown for matched text in decode output.
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Engine configuration.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WordmarkConfig {
    /// Secret keying the watermark primitive.
    pub secret: String,

    /// Stopword list (one word per line). Built-in English list when unset.
    pub stopwords: Option<PathBuf>,

    /// Indentation of re-serialized JSON documents (0 = compact).
    pub json_indent: usize,

    /// Characters of matched text shown in decode output.
    pub preview_chars: usize,
}

impl Default for WordmarkConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            stopwords: None,
            json_indent: DEFAULT_JSON_INDENT,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl WordmarkConfig {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`, using defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Path of the default configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(home.join(".wordmark").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = WordmarkConfig::default();
        assert_eq!(config.secret, "p@ssw0rd");
        assert_eq!(config.json_indent, 4);
        assert_eq!(config.preview_chars, 100);
        assert!(config.stopwords.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = WordmarkConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, WordmarkConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "secret = \"hunter2\"\njson_indent = 2\n").unwrap();

        let config = WordmarkConfig::load_from(&path).unwrap();
        assert_eq!(config.secret, "hunter2");
        assert_eq!(config.json_indent, 2);
        assert_eq!(config.preview_chars, DEFAULT_PREVIEW_CHARS);
    }

    #[test]
    fn test_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "secret = \"s\"\nstopwords = \"/tmp/stop.txt\"\njson_indent = 0\npreview_chars = 20\n",
        )
        .unwrap();

        let config = WordmarkConfig::load_from(&path).unwrap();
        assert_eq!(
            config,
            WordmarkConfig {
                secret: "s".to_string(),
                stopwords: Some(PathBuf::from("/tmp/stop.txt")),
                json_indent: 0,
                preview_chars: 20,
            }
        );
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "secret = ").unwrap();

        assert!(matches!(
            WordmarkConfig::load_from(&path),
            Err(ConfigError::TomlParseError(_))
        ));
    }
}
