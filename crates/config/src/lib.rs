//! Configuration loading, validation, and management for Remind.
//!
//! Loads configuration from `~/.remind/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.remind/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per model reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP timeout for one model call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Built-in tool settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_request_timeout_secs() -> u64 {
    120
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
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("agent", &self.agent)
            .field("tools", &self.tools)
            .finish()
    }
}

/// Settings for the reasoning-acting loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum think-act-observe cycles per run
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,

    /// Base instructions; used as the system prompt and the prompt preamble
    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// Per-invocation tool timeout. Unset means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_timeout_secs: Option<u64>,

    /// Treat model-call timeouts as a recoverable cycle instead of failing the run
    #[serde(default)]
    pub recover_transport_timeouts: bool,
}

fn default_max_cycles() -> usize {
    10
}
fn default_instructions() -> String {
    "You are a careful research assistant. Answer the human's question by \
     reasoning step by step and using the available tools when they help."
        .into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
            instructions: default_instructions(),
            tool_timeout_secs: None,
            recover_transport_timeouts: false,
        }
    }
}

/// Settings for the built-in tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Directory `file_read` resolves paths against; reads cannot leave it.
    /// Relative roots are taken from the working directory.
    #[serde(default = "default_file_root")]
    pub file_root: PathBuf,
}

fn default_file_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            file_root: default_file_root(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path with env var overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `REMIND_*` overrides using the given variable lookup.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("REMIND_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("REMIND_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = lookup("REMIND_MODEL") {
            self.model = model;
        }
        if let Some(root) = lookup("REMIND_FILE_ROOT") {
            self.tools.file_root = PathBuf::from(root);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".remind")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_cycles == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_cycles must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 || self.agent.tool_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        if self.tools.file_root.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "tools.file_root must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            agent: AgentConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
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
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.agent.max_cycles, 10);
        assert!(!config.agent.recover_transport_timeouts);
        assert!(config.agent.tool_timeout_secs.is_none());
        assert_eq!(config.tools.file_root, PathBuf::from("."));
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.agent.instructions, config.agent.instructions);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_cycle_budget_rejected() {
        let mut config = AppConfig::default();
        config.agent.max_cycles = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_cycles"));
    }

    #[test]
    fn zero_tool_timeout_rejected() {
        let mut config = AppConfig::default();
        config.agent.tool_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
model = "local-llama"

[agent]
max_cycles = 4
tool_timeout_secs = 30
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "local-llama");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.agent.max_cycles, 4);
        assert_eq!(config.agent.tool_timeout_secs, Some(30));
        assert_eq!(config.agent.instructions, default_instructions());
    }

    #[test]
    fn file_root_is_read_from_tools_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[tools]
file_root = "/srv/notes"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.tools.file_root, PathBuf::from("/srv/notes"));
        assert_eq!(config.agent.max_cycles, 10);
    }

    #[test]
    fn empty_file_root_rejected() {
        let mut config = AppConfig::default();
        config.tools.file_root = PathBuf::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("file_root"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [unterminated").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-fallback"),
            ("REMIND_MODEL", "gpt-4o"),
            ("REMIND_BASE_URL", "http://localhost:11434/v1"),
            ("REMIND_FILE_ROOT", "/srv/notes"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config.apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-fallback"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.tools.file_root, PathBuf::from("/srv/notes"));

        config.apply_env_overrides(|k| (k == "REMIND_API_KEY").then(|| "sk-remind".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-remind"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o-mini"));
        assert!(toml_str.contains("max_cycles = 10"));
        assert!(toml_str.contains("[tools]"));
    }
}
