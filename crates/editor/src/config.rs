//! Editor configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `EDITOR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `EDITOR_HOST` - Bind address (default: 127.0.0.1)
//! - `EDITOR_PORT` - Listen port (default: 4000)
//! - `EDITOR_SESSION_TTL_SECS` - Idle lifetime of editing sessions (default: 1800)
//! - `EDITOR_RUN_MIGRATIONS` - Run pending migrations on startup (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g., production)
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Problems loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Editor application configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// `PostgreSQL` connection URL; holds the password, hence secret
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// How long an idle editing session is kept before eviction
    pub session_ttl: Duration,
    /// Whether to run pending database migrations on startup
    pub run_migrations: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error event sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

impl EditorConfig {
    /// Load configuration from environment variables, reading a `.env` file
    /// first when one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or any variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let session_ttl = Duration::from_secs(parsed_env("EDITOR_SESSION_TTL_SECS", 1800)?);

        Ok(Self {
            database_url: database_url_from_env()?,
            host: parsed_env("EDITOR_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parsed_env("EDITOR_PORT", 4000)?,
            session_ttl,
            run_migrations: flag_env("EDITOR_RUN_MIGRATIONS"),
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
            sentry_sample_rate: parsed_env("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parsed_env("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }

    /// The socket address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// The database URL, preferring `EDITOR_DATABASE_URL` over the generic
/// `DATABASE_URL` a platform's postgres attach sets.
fn database_url_from_env() -> Result<SecretString, ConfigError> {
    ["EDITOR_DATABASE_URL", "DATABASE_URL"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar("EDITOR_DATABASE_URL".to_string()))
}

/// Parse an environment variable, using `default` when it is unset.
fn parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// A boolean flag variable. "1", "true", and "yes" (case-insensitive) mean
/// on; anything else, including unset, means off.
fn flag_env(key: &str) -> bool {
    std::env::var(key).is_ok_and(|raw| {
        matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes")
    })
}
