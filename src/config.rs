//! Configuration loading and management for summa-url.
//!
//! Settings come from `summa-url.toml`; the API key is looked up separately
//! through [`Secrets`] so it never lives in the main config file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "summa-url";
const CONFIG_FILE: &str = "summa-url.toml";
const SECRETS_FILE: &str = "secrets.toml";

/// Name of the secret holding the Groq API key.
pub const API_KEY_SECRET: &str = "GROQ_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("failed to serialise config: {0}")]
    WriteError(#[from] toml::ser::Error),
    #[error("config file already exists: {0}")]
    AlreadyExists(PathBuf),
}

/// LLM provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier sent with every request
    pub model: String,
    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,
    /// Request timeout for the model call
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Content loading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// User-Agent sent when fetching web pages
    pub user_agent: String,
    /// Accept self-signed or otherwise broken certificates
    pub accept_invalid_certs: bool,
    /// Timeout for page fetches
    pub timeout_secs: u64,
    /// Substrings marking a URL as a video link
    pub video_markers: Vec<String>,
    /// Caption languages to try, in order of preference
    pub transcript_languages: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            accept_invalid_certs: true,
            timeout_secs: 30,
            video_markers: vec!["youtube.com".to_string(), "youtu.be".to_string()],
            transcript_languages: vec!["en".to_string()],
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_file(CONFIG_FILE) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write this configuration to `path`, refusing to overwrite an existing file
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Where `init` writes a fresh config file
    pub fn default_path() -> PathBuf {
        config_dir()
            .map(|dir| dir.join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Find a file in the current directory, then in ~/.config/summa-url
    fn find_file(name: &str) -> Option<PathBuf> {
        let local = PathBuf::from(name);
        if local.exists() {
            return Some(local);
        }

        config_dir()
            .map(|dir| dir.join(name))
            .filter(|path| path.exists())
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(APP_DIR))
}

/// Flat key lookup over `secrets.toml` and the environment.
///
/// Environment variables win over file entries. Unknown keys read as an
/// empty string.
#[derive(Default)]
pub struct Secrets {
    values: HashMap<String, String>,
}

impl Secrets {
    /// Load `secrets.toml` from the standard locations plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut secrets = match Config::find_file(SECRETS_FILE) {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        secrets.overlay_env(API_KEY_SECRET);
        Ok(secrets)
    }

    /// Load secrets from a specific file, ignoring non-string values
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let table: toml::Table = toml::from_str(&content)?;
        let values = table
            .into_iter()
            .filter_map(|(key, value)| match value {
                toml::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();
        Ok(Self { values })
    }

    /// Look up a secret, returning an empty string when unset
    pub fn get(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// The model credential, possibly blank
    pub fn credential(&self) -> Credential {
        Credential::new(self.get(API_KEY_SECRET))
    }

    fn overlay_env(&mut self, key: &str) {
        if let Ok(value) = std::env::var(key) {
            self.values.insert(key.to_string(), value);
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// API token for the model service. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// True when the token is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The raw token, for the Authorization header only
    pub fn expose(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}
