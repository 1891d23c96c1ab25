use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const PLACEHOLDER_API_KEY: &str = "YOUR_DEEPL_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub deepl_api_key: Option<String>,
    pub endpoint: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Minimum gap between two translation requests.
    pub min_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deepl_api_key: None,
            endpoint: "https://api-free.deepl.com/v2/translate".into(),
            source_lang: "JA".into(),
            target_lang: "EN".into(),
            min_interval_ms: 1000,
        }
    }
}

impl Config {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OrganizerError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("keitai-organizer").join("config.json"))
    }

    /// The configured key, or `MissingApiKey` pointing at `config_path`.
    pub fn api_key(&self, config_path: &Path) -> Result<&str> {
        match self.deepl_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(OrganizerError::MissingApiKey(config_path.to_path_buf())),
        }
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.min_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"deepl_api_key": "abc:fx", "min_interval_ms": 250}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_key(&path).unwrap(), "abc:fx");
        assert_eq!(config.min_interval_ms, 250);
        assert_eq!(config.target_lang, "EN");
    }

    #[test]
    fn test_placeholder_key_is_unset() {
        let path = PathBuf::from("config.json");
        let mut config = Config::default();
        assert!(matches!(config.api_key(&path), Err(OrganizerError::MissingApiKey(_))));

        config.deepl_api_key = Some(PLACEHOLDER_API_KEY.into());
        assert!(config.api_key(&path).is_err());

        config.deepl_api_key = Some("   ".into());
        assert!(config.api_key(&path).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(OrganizerError::Json(_))));
    }
}
