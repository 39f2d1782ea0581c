//! Configuration Management
//!
//! Resolves client settings from an optional JSON file and the environment.
//! The file is only ever read; nothing is persisted by the client.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// API version the typed records in this crate are shaped after
pub const DEFAULT_API_VERSION: &str = "2019-12-03";

const ENV_API_KEY: &str = "STRIPE_SECRET_KEY";
const ENV_API_BASE: &str = "STRIPE_API_BASE";
const ENV_API_VERSION: &str = "STRIPE_API_VERSION";

/// Settings shared by every request a client makes
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_base: Url,
    pub api_version: String,
    pub user_agent: String,
    /// Default per-request timeout; `RequestOptions::timeout` takes precedence
    pub timeout: Option<Duration>,
}

/// On-disk shape, every field optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base: Option<Url>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read a config file; a missing file yields the empty config
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: default_api_base(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: default_user_agent(),
            timeout: None,
        }
    }

    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stripe-resource").join("config.json"))
    }

    /// Load configuration (environment > config file > defaults)
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => match FileConfig::read(&path) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable config file: {:#}", e);
                    FileConfig::default()
                },
            },
            None => FileConfig::default(),
        };

        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Merge a file config with environment lookups
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = env(ENV_API_KEY)
            .filter(|k| !k.is_empty())
            .or(file.api_key)
            .with_context(|| {
                format!(
                    "API key not found. Set {} or api_key in the config file",
                    ENV_API_KEY
                )
            })?;

        if !is_recognized_key(&api_key) {
            tracing::warn!("API key does not look like a secret or restricted key");
        }

        let api_base = match env(ENV_API_BASE) {
            Some(raw) => {
                Url::parse(&raw).with_context(|| format!("Invalid {}: {}", ENV_API_BASE, raw))?
            },
            None => file.api_base.unwrap_or_else(default_api_base),
        };

        let api_version = env(ENV_API_VERSION)
            .or(file.api_version)
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Ok(Self {
            api_key,
            api_base,
            api_version,
            user_agent: file.user_agent.unwrap_or_else(default_user_agent),
            timeout: file.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Whether the key addresses test-mode data
    pub fn is_test_mode(&self) -> bool {
        self.api_key.starts_with("sk_test_") || self.api_key.starts_with("rk_test_")
    }
}

fn is_recognized_key(api_key: &str) -> bool {
    api_key.starts_with("sk_") || api_key.starts_with("rk_")
}

fn default_api_base() -> Url {
    // Constant input, always parses
    Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL")
}

fn default_user_agent() -> String {
    format!("stripe-resource/{}", crate::VERSION)
}

// Security: the API key never appears in debug output
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base.as_str())
            .field("api_version", &self.api_version)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
