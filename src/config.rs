//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JOIN_CODE_LENGTH, DEFAULT_JOIN_GRACE_SECONDS,
    DEFAULT_LOCK_TIMEOUT_MS, DEFAULT_LOG_FORMAT, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_TICK_INTERVAL_MS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub engine: EngineConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_format: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Identity token configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// How equal leaderboard keys are ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePolicy {
    /// Every entry gets its own rank
    #[default]
    Strict,
    /// Entries with equal score, time and completion time share a rank
    Shared,
}

impl TiePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "shared" => Some(Self::Shared),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Shared => "shared",
        }
    }
}

/// Session engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Scheduler period
    pub tick_interval: Duration,
    /// Upper bound on waiting for a quiz lock
    pub lock_timeout: Duration,
    /// Seconds before `scheduled_at` during which a scheduled quiz is joinable
    pub join_grace_seconds: i64,
    /// Length of generated join codes
    pub join_code_length: usize,
    pub tie_policy: TiePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            lock_timeout: Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS),
            join_grace_seconds: DEFAULT_JOIN_GRACE_SECONDS,
            join_code_length: DEFAULT_JOIN_CODE_LENGTH,
            tie_policy: TiePolicy::Strict,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            engine: EngineConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| DEFAULT_LOG_FORMAT.to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
        })
    }
}

impl EngineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let tie_policy = match env::var("LEADERBOARD_TIE_POLICY") {
            Ok(raw) => TiePolicy::from_str(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("LEADERBOARD_TIE_POLICY".to_string()))?,
            Err(_) => TiePolicy::default(),
        };

        let join_code_length: usize = parse_var("ENGINE_JOIN_CODE_LENGTH", DEFAULT_JOIN_CODE_LENGTH)?;
        if !(4..=16).contains(&join_code_length) {
            return Err(ConfigError::InvalidValue("ENGINE_JOIN_CODE_LENGTH".to_string()));
        }

        Ok(Self {
            tick_interval: Duration::from_millis(parse_var(
                "ENGINE_TICK_INTERVAL_MS",
                DEFAULT_TICK_INTERVAL_MS,
            )?),
            lock_timeout: Duration::from_millis(parse_var(
                "ENGINE_LOCK_TIMEOUT_MS",
                DEFAULT_LOCK_TIMEOUT_MS,
            )?),
            join_grace_seconds: parse_var("ENGINE_JOIN_GRACE_SECONDS", DEFAULT_JOIN_GRACE_SECONDS)?,
            join_code_length,
            tie_policy,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
