//! Configuration loading and validation for Docstash.
//!
//! Loads configuration from `docstash.toml` in the working directory (or an
//! explicit path) with environment variable overrides for the API key.
//! Validates all settings at startup. The resulting [`AppConfig`] is passed
//! explicitly to every component constructor — there is no global mutable
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `docstash.toml`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// External LLM API configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store", &self.store)
            .field("gateway", &self.gateway)
            .field("llm", &self.llm)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file path.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "document_store.db".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for `/` and unmatched paths.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}
fn default_static_dir() -> String {
    ".".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Bearer credential for the completion API. No placeholder default:
    /// an absent key surfaces as an authentication error at call time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,
}

fn default_base_url() -> String {
    "https://api.deepseek.com".into()
}
fn default_model() -> String {
    "deepseek-chat".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (`./docstash.toml`).
    ///
    /// Also checks environment variables for the API key:
    /// - `DOCSTASH_API_KEY` (highest priority)
    /// - `DEEPSEEK_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("docstash.toml"))
    }

    /// Load configuration from a specific file path, with env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env_key(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Fill `llm.api_key` from the environment when the file did not set one.
    ///
    /// A file-provided key always wins; `DOCSTASH_API_KEY` outranks
    /// `DEEPSEEK_API_KEY`. The lookup is injected so the priority order is
    /// testable without touching the process environment.
    fn apply_env_key(&mut self, var: impl Fn(&str) -> Option<String>) {
        if self.llm.api_key.is_none() {
            self.llm.api_key = var("DOCSTASH_API_KEY").or_else(|| var("DEEPSEEK_API_KEY"));
        }
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be non-zero".into(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".into(),
            ));
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.base_url must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.llm.api_key.is_some()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.path, "document_store.db");
        assert_eq!(config.gateway.port, 5000);
        assert_eq!(config.llm.model, "deepseek-chat");
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.store.path, config.store.path);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.llm.base_url, config.llm.base_url);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::read_file(Path::new("/nonexistent/docstash.toml")).unwrap();
        assert_eq!(config.gateway.port, 5000);
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\nport = 8080").unwrap();

        let config = AppConfig::read_file(file.path()).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.store.path, "document_store.db");
    }

    #[test]
    fn file_key_wins_over_env() {
        let mut config = AppConfig {
            llm: LlmConfig {
                api_key: Some("sk-from-file".into()),
                ..LlmConfig::default()
            },
            ..AppConfig::default()
        };
        config.apply_env_key(|_| Some("sk-from-env".into()));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-from-file"));
    }

    #[test]
    fn docstash_key_outranks_deepseek_key() {
        let mut config = AppConfig::default();
        config.apply_env_key(|name| match name {
            "DOCSTASH_API_KEY" => Some("sk-docstash".into()),
            "DEEPSEEK_API_KEY" => Some("sk-deepseek".into()),
            _ => None,
        });
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-docstash"));
    }

    #[test]
    fn deepseek_key_used_as_fallback() {
        let mut config = AppConfig::default();
        config.apply_env_key(|name| match name {
            "DEEPSEEK_API_KEY" => Some("sk-deepseek".into()),
            _ => None,
        });
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-deepseek"));
    }

    #[test]
    fn unset_env_leaves_api_key_absent() {
        let mut config = AppConfig::default();
        config.apply_env_key(|_| None);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn zero_port_rejected() {
        let config = AppConfig {
            gateway: GatewayConfig {
                port: 0,
                ..GatewayConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_model_rejected() {
        let config = AppConfig {
            llm: LlmConfig {
                model: "  ".into(),
                ..LlmConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            llm: LlmConfig {
                api_key: Some("sk-secret".into()),
                ..LlmConfig::default()
            },
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
