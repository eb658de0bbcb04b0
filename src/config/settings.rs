//! Settings structures for dualsearch configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure matching dualsearch.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub keyword_server: KeywordServerSettings,
    pub semantic_server: SemanticServerSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Read `path` (or start from defaults when there is none), then apply
    /// env overrides. Pair with [`Settings::locate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Settings::default(),
        };
        settings.merge_env();
        Ok(settings)
    }

    /// Find the settings file: an explicit path wins, then
    /// `DUALSEARCH_SETTINGS_PATH`, `./dualsearch.yml` and the user config dir
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var("DUALSEARCH_SETTINGS_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let mut candidates = vec![PathBuf::from("dualsearch.yml")];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("dualsearch/settings.yml"));
        }
        candidates.into_iter().find(|p| p.exists())
    }

    /// Merge with environment variables (DUALSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DUALSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("DUALSEARCH_KEYWORD_HOST") {
            self.keyword_server.host = val;
        }
        if let Ok(val) = std::env::var("DUALSEARCH_KEYWORD_PORT") {
            if let Ok(port) = val.parse() {
                self.keyword_server.port = port;
            }
        }
        if let Ok(val) = std::env::var("DUALSEARCH_SEMANTIC_HOST") {
            self.semantic_server.host = val;
        }
        if let Ok(val) = std::env::var("DUALSEARCH_SEMANTIC_PORT") {
            if let Ok(port) = val.parse() {
                self.semantic_server.port = port;
            }
        }
        if let Ok(val) = std::env::var("DUALSEARCH_SEMANTIC_ENABLED") {
            if let Ok(enabled) = val.parse() {
                self.semantic_server.enabled = enabled;
            }
        }
        if let Ok(val) = std::env::var("DUALSEARCH_MAX_RESULTS") {
            if let Ok(max) = val.parse() {
                self.search.max_results = max;
            }
        }
        if let Ok(val) = std::env::var("DUALSEARCH_SYMBOLS_ONLY") {
            if let Ok(flag) = val.parse() {
                self.search.symbols_only = flag;
            }
        }
        if let Ok(val) = std::env::var("DUALSEARCH_PREFER_SEMANTIC") {
            if let Ok(flag) = val.parse() {
                self.search.prefer_semantic = flag;
            }
        }
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Keyword (trigram) backend address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeywordServerSettings {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for KeywordServerSettings {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Semantic (embedding) backend address and switch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticServerSettings {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// When false the AI results provider never contacts the backend
    pub enabled: bool,
}

impl Default for SemanticServerSettings {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3001,
            enabled: false,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// Upper bound on results requested from either backend
    pub max_results: usize,
    /// Restrict keyword matches to symbol definitions/references
    pub symbols_only: bool,
    /// Present the semantic section before the keyword section
    pub prefer_semantic: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 100,
            symbols_only: false,
            prefer_semantic: false,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Idle connections kept per backend
    pub pool_maxsize: usize,
    /// User-Agent header sent to both backends
    pub user_agent: String,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            pool_maxsize: 8,
            user_agent: format!("dualsearch/{}", crate::VERSION),
        }
    }
}
