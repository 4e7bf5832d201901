//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::PatientClientConfig;
use crate::validation::{ValidationTable, ValidationTableError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset keeps the transport default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// Where the CLI keeps its session cookie and user cache
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Default for `login --remember-me`
    #[serde(default)]
    pub remember_me: bool,
}

fn default_state_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("sepsis-dashboard").to_string_lossy().to_string())
        .unwrap_or_else(|| "./.sepsis-dashboard".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            remember_me: false,
        }
    }
}

/// Range table used by client-side validation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// TOML file replacing the builtin table
    #[serde(default)]
    pub table: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("sepsis-dashboard").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SEPSIS_API_URL") {
            self.api.base_url = url;
        }
        if let Some(dir) = lookup("SEPSIS_STATE_DIR") {
            self.session.state_dir = dir;
        }
        if let Some(table) = lookup("SEPSIS_VALIDATION_TABLE") {
            self.validation.table = Some(table);
        }
        if let Some(level) = lookup("SEPSIS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SEPSIS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn state_dir(&self) -> PathBuf {
        expand_home(&self.session.state_dir)
    }

    /// Backend client settings (no session attached)
    pub fn client_config(&self) -> PatientClientConfig {
        PatientClientConfig {
            base_url: self.api.base_url.clone(),
            session_token: None,
            request_timeout_secs: self.api.request_timeout_secs,
        }
    }

    /// The configured range table, or the builtin one
    pub fn validation_table(&self) -> Result<ValidationTable, ValidationTableError> {
        match &self.validation.table {
            Some(path) => ValidationTable::load(&expand_home(path)),
            None => Ok(ValidationTable::builtin()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sepsis Dashboard Configuration
#
# Environment variables override these settings:
# - SEPSIS_API_URL
# - SEPSIS_STATE_DIR
# - SEPSIS_VALIDATION_TABLE
# - SEPSIS_LOG_LEVEL
# - SEPSIS_LOG_FORMAT

[api]
# Prediction backend base URL
base_url = "http://localhost:5000"

# Request timeout in seconds (unset: transport default)
# request_timeout_secs = 30

[session]
# Where the session cookie and cached user are stored
state_dir = "~/.local/share/sepsis-dashboard"

# Keep sessions for 30 days by default
remember_me = false

[validation]
# Range table replacing the builtin one, e.g.
#   [fields.HR]
#   min = 40
#   max = 200
#   unit = "bpm"
#   display_name = "Heart Rate"
# table = "~/.config/sepsis-dashboard/ranges.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.request_timeout_secs, None);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validation.table.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://sepsis.example.org\"\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.api.base_url, "https://sepsis.example.org");
        assert_eq!(config.logging.level, "info");
        assert!(!config.session.remember_me);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[api\n").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("SEPSIS_API_URL", "http://10.0.0.5:5000"),
            ("SEPSIS_LOG_FORMAT", "json"),
            ("SEPSIS_VALIDATION_TABLE", "/etc/ranges.toml"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.5:5000");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.validation.table.as_deref(), Some("/etc/ranges.toml"));
    }

    #[test]
    fn test_validation_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranges.toml");
        std::fs::write(
            &path,
            "[fields.HR]\nmin = 30\nmax = 220\nunit = \"bpm\"\ndisplay_name = \"Heart Rate\"\n",
        )
        .unwrap();

        let mut config = Config::default();
        assert!(config.validation_table().unwrap().len() > 1);

        config.validation.table = Some(path.to_string_lossy().to_string());
        let table = config.validation_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("HR").unwrap().max, 220.0);
    }
}
