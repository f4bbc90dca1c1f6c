use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::normalize_url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    // TOML is the primary format. A legacy JSON state file is still read and
    // rewritten as TOML when no TOML config exists.
    fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("chat-sync.toml"))
    }

    fn legacy_json_path() -> Option<PathBuf> {
        let proj = directories::ProjectDirs::from("com", "example", "ChatSync")?;
        Some(proj.config_dir().join("state.json"))
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<Settings>(text)?)
    }

    pub fn load() -> Self {
        let mut settings = Self::load_file().unwrap_or_default();
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    fn load_file() -> Option<Self> {
        let toml_path = Self::toml_path()?;
        Self::load_from(&toml_path, Self::legacy_json_path().as_deref())
    }

    /// Reads `toml_path`, or migrates `legacy_path` into it when no TOML
    /// file exists. An unreadable TOML file is left untouched.
    fn load_from(toml_path: &Path, legacy_path: Option<&Path>) -> Option<Self> {
        if toml_path.exists() {
            let loaded = fs::read_to_string(toml_path)
                .map_err(ConfigError::from)
                .and_then(|text| Self::from_toml(&text));
            return match loaded {
                Ok(settings) => Some(settings),
                Err(e) => {
                    log::warn!("ignoring {}: {}", toml_path.display(), e);
                    None
                }
            };
        }

        let bytes = fs::read(legacy_path?).ok()?;
        let settings = serde_json::from_slice::<Settings>(&bytes).ok()?;
        if let Err(e) = settings.save_to(toml_path) {
            log::warn!("could not migrate legacy config: {}", e);
        }
        Some(settings)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CHAT_SYNC_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(token) = lookup("CHAT_SYNC_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.token = Some(token);
        }
    }

    /// Normalizes and checks `base_url`.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.base_url = normalize_url(&self.base_url);
        url::Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        Ok(self)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::toml_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = Settings::from_toml(r#"token = "abc""#).unwrap();
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.token.as_deref(), Some("abc"));
        assert_eq!(s.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut s = Settings::default();
        s.apply_env(|key| match key {
            "CHAT_SYNC_BASE_URL" => Some("chat.example.com/api".into()),
            "CHAT_SYNC_TOKEN" => Some("  ".into()),
            _ => None,
        });
        assert_eq!(s.base_url, "chat.example.com/api");
        assert_eq!(s.token, None);
        let s = s.validated().unwrap();
        assert_eq!(s.base_url, "https://chat.example.com/api");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let s = Settings {
            base_url: "http://exa mple.com".into(),
            ..Settings::default()
        };
        assert!(matches!(s.validated(), Err(ConfigError::BaseUrl { .. })));
    }

    const LEGACY_JSON: &str = r#"{"base_url": "http://legacy.example.com", "token": "old"}"#;

    #[test]
    fn legacy_json_is_migrated_when_no_toml_exists() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("chat-sync.toml");
        let legacy = dir.path().join("state.json");
        fs::write(&legacy, LEGACY_JSON).unwrap();

        let s = Settings::load_from(&toml_path, Some(&legacy)).unwrap();

        assert_eq!(s.base_url, "http://legacy.example.com");
        let migrated = Settings::from_toml(&fs::read_to_string(&toml_path).unwrap()).unwrap();
        assert_eq!(migrated, s);
    }

    #[test]
    fn broken_toml_is_not_overwritten_by_legacy_json() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("chat-sync.toml");
        let legacy = dir.path().join("state.json");
        let broken = "base_url = [unterminated";
        fs::write(&toml_path, broken).unwrap();
        fs::write(&legacy, LEGACY_JSON).unwrap();

        assert!(Settings::load_from(&toml_path, Some(&legacy)).is_none());
        assert_eq!(fs::read_to_string(&toml_path).unwrap(), broken);
    }
}
