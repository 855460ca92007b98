//! Application configuration
//!
//! Loaded from a TOML file (`~/.config/psicoespacios/config.toml` by default,
//! `PSICO_CONFIG` to point elsewhere). Every section and field is optional;
//! missing values fall back to [`AppConfig::default`]. `DATABASE_URL`
//! overrides `database.url`.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! shutdown_timeout = 30
//!
//! [database]
//! url = "sqlite://./psicoespacios.db?mode=rwc"
//! max_connections = 10
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [scheduling]
//! default_months = 3
//! max_months = 12
//!
//! [billing]
//! currency = "CLP"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::schedule::SchedulingWindow;
use crate::infrastructure::DatabaseConfig;

pub const CONFIG_ENV: &str = "PSICO_CONFIG";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub scheduling: SchedulingConfig,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds granted to in-flight requests after a shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// `sqlite://...` or `postgres://...`
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive; `RUST_LOG` wins when set
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Deadline applied when an assignment omits it, in months after the start
    pub default_months: u32,
    /// Furthest deadline accepted, in months after today
    pub max_months: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        let window = SchedulingWindow::default();
        Self {
            default_months: window.default_months,
            max_months: window.max_months,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Currency of packs created without one
    pub currency: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency: "CLP".to_string(),
        }
    }
}

/// `~/.config/psicoespacios/config.toml`, or `./config.toml` without a home.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("psicoespacios").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// `PSICO_CONFIG` when set, otherwise [`default_config_path`].
pub fn resolve_config_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

impl AppConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };
        config.apply_overrides(std::env::var(DATABASE_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self)?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, raw).map_err(io_err)
    }

    pub fn apply_overrides(&mut self, database_url: Option<String>) {
        if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
            self.database.url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.scheduling.default_months == 0 {
            return Err(ConfigError::Invalid(
                "scheduling.default_months must be at least 1".into(),
            ));
        }
        if self.scheduling.max_months < self.scheduling.default_months {
            return Err(ConfigError::Invalid(format!(
                "scheduling.max_months ({}) is below default_months ({})",
                self.scheduling.max_months, self.scheduling.default_months
            )));
        }
        let currency = &self.billing.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "billing.currency must be a 3-letter code, got '{}'",
                currency
            )));
        }
        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn scheduling_window(&self) -> SchedulingWindow {
        SchedulingWindow {
            default_months: self.scheduling.default_months,
            max_months: self.scheduling.max_months,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [server]
            port = 9090

            [billing]
            currency = "USD"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.billing.currency, "USD");
        assert_eq!(cfg.scheduling.default_months, 3);
        assert_eq!(cfg.scheduling.max_months, 12);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_file_is_the_default() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.server.address(), "0.0.0.0:8080");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = AppConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn database_url_override_wins() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(Some("postgres://u:p@db/psico".into()));
        assert_eq!(cfg.database_config().url, "postgres://u:p@db/psico");

        let mut untouched = AppConfig::default();
        untouched.apply_overrides(Some("  ".into()));
        assert_eq!(untouched.database.url, AppConfig::default().database.url);
    }

    #[test]
    fn inconsistent_windows_fail_validation() {
        let mut cfg = AppConfig::default();
        cfg.scheduling.default_months = 6;
        cfg.scheduling.max_months = 4;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_log_format_fails_validation() {
        let mut cfg = AppConfig::default();
        cfg.logging.format = "xml".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = std::env::temp_dir()
            .join(format!("psico-config-{}", uuid::Uuid::new_v4()))
            .join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.server.port = 7070;
        cfg.save(&path).unwrap();

        let loaded = AppConfig::from_toml_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.server.port, 7070);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
