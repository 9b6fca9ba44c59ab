//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/bike-charging/config.toml`).
//! Every section and field is optional; missing values take the defaults
//! below.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [charging]
//! tick_interval_ms = 1000
//! startup_recovery = "clear"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::charging::{ChargingSettings, StartupRecovery};
use crate::domain::ChargeBounds;
use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default config location: `<config dir>/bike-charging/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bike-charging")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub charging: ChargingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
            connect_timeout_secs: db.connect_timeout_secs,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> &str {
        &self.url
    }
}

impl From<&DatabaseSection> for DatabaseConfig {
    fn from(section: &DatabaseSection) -> Self {
        Self {
            url: section.url.clone(),
            max_connections: section.max_connections,
            connect_timeout_secs: section.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargingSection {
    pub tick_interval_ms: u64,
    pub full_mark: f64,
    pub floor: f64,
    pub clamp_to_full_mark: bool,
    pub startup_recovery: StartupRecovery,
}

impl Default for ChargingSection {
    fn default() -> Self {
        let bounds = ChargeBounds::default();
        Self {
            tick_interval_ms: 1000,
            full_mark: bounds.full_mark,
            floor: bounds.floor,
            clamp_to_full_mark: true,
            startup_recovery: StartupRecovery::default(),
        }
    }
}

impl From<&ChargingSection> for ChargingSettings {
    fn from(section: &ChargingSection) -> Self {
        Self {
            tick_interval: Duration::from_millis(section.tick_interval_ms),
            bounds: ChargeBounds::new(section.floor, section.full_mark),
            clamp_to_full_mark: section.clamp_to_full_mark,
            startup_recovery: section.startup_recovery,
        }
    }
}

impl AppConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let charging = &self.charging;
        if charging.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "charging.tick_interval_ms must be greater than zero".into(),
            ));
        }
        if !(charging.floor.is_finite() && charging.full_mark.is_finite())
            || charging.floor >= charging.full_mark
        {
            return Err(ConfigError::Invalid(format!(
                "charging.floor ({}) must be below charging.full_mark ({})",
                charging.floor, charging.full_mark
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn charging_settings(&self) -> ChargingSettings {
        ChargingSettings::from(&self.charging)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::from(&self.database)
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");

        let settings = config.charging_settings();
        assert_eq!(settings.tick_interval, Duration::from_secs(1));
        assert_eq!(settings.bounds, ChargeBounds::default());
        assert_eq!(settings.startup_recovery, StartupRecovery::Resume);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [charging]
            tick_interval_ms = 250
            startup_recovery = "clear"
            clamp_to_full_mark = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.api_address(), "0.0.0.0:9090");

        let settings = config.charging_settings();
        assert_eq!(settings.tick_interval, Duration::from_millis(250));
        assert_eq!(settings.startup_recovery, StartupRecovery::Clear);
        assert_eq!(settings.level_cap(), None);
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config: AppConfig = toml::from_str("[charging]\ntick_interval_ms = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config: AppConfig =
            toml::from_str("[charging]\nfloor = 50.0\nfull_mark = 40.0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_recovery_policy_fails_to_parse() {
        let parsed: Result<AppConfig, _> = toml::from_str("[charging]\nstartup_recovery = \"maybe\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
