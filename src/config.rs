//! Global configuration parsing and validation.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Connection pool settings for the `SQLite` store.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a writer waits for the database lock before failing.
    #[serde(default = "default_busy_timeout_seconds")]
    pub busy_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            busy_timeout_seconds: default_busy_timeout_seconds(),
        }
    }
}

impl DatabaseConfig {
    /// Busy timeout as a [`Duration`].
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_seconds)
    }
}

/// Booking rules for personal training sessions.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SchedulingConfig {
    /// Room type that may host a personal training session.
    #[serde(default = "default_eligible_room_type")]
    pub eligible_room_type: String,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            eligible_room_type: default_eligible_room_type(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_seconds() -> u64 {
    5
}

fn default_eligible_room_type() -> String {
    "Personal Training".into()
}

fn default_http_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_http_port() -> u16 {
    8080
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_http_host")]
    pub http_host: IpAddr,
    /// HTTP port; `0` lets the OS pick one.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Location of the `SQLite` database file.
    pub db_path: PathBuf,
    /// Pool settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Booking rules.
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Socket address the HTTP server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http_host, self.http_port)
    }

    fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(AppError::Config(
                "database.max_connections must be greater than zero".into(),
            ));
        }

        if self.scheduling.eligible_room_type.trim().is_empty() {
            return Err(AppError::Config(
                "scheduling.eligible_room_type must not be empty".into(),
            ));
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("db_path must not be empty".into()));
        }

        Ok(())
    }
}
