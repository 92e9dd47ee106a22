//! Application Configuration
//!
//! Loaded once at startup from `CONFIG_PATH` (default `config.json`) or, when
//! that file does not exist, from environment variables.

use anyhow::{Context, anyhow, bail};
use platform::password::PasswordHashParams;
use platform::rate_limit::RateLimitConfig;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::env;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use user::UserConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Process configuration, keys in camelCase
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub port: u16,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub signature_key: String,
    /// Accepted skew of `x-request-at`; absent means timestamps are not checked
    #[serde(default)]
    pub signature_tolerance_seconds: Option<u64>,
    pub database: DatabaseConfig,
    pub rate_limiter_max_requests: u32,
    pub rate_limiter_time_seconds: u64,
    /// Key the rate limiter on `x-forwarded-for`; only safe behind a proxy that sets it
    #[serde(default)]
    pub rate_limiter_trust_forwarded_for: bool,
    pub jwt_secret_key: String,
    /// Token lifetime in minutes
    pub jwt_expiration_time: u64,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual fields
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_max_open")]
    pub max_open_connections: u32,
    #[serde(default)]
    pub max_idle_connections: u32,
    /// Seconds; 0 keeps connections indefinitely
    #[serde(default)]
    pub max_lifetime_connections: u64,
    /// Seconds; 0 never closes idle connections
    #[serde(default)]
    pub max_idle_time: u64,
}

fn default_app_name() -> String {
    "user-service".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_max_open() -> u32 {
    10
}

impl AppConfig {
    /// Load from the config file if present, otherwise from the environment
    pub fn load() -> anyhow::Result<Self> {
        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let config = if Path::new(&path).exists() {
            tracing::info!(path = %path, "Loading configuration file");
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path))?;
            Self::from_json(&raw).with_context(|| format!("invalid configuration in {}", path))?
        } else {
            tracing::info!(path = %path, "Configuration file not found, using environment");
            Self::from_env()?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: parsed("PORT", 8001)?,
            app_name: optional("APP_NAME").unwrap_or_else(default_app_name),
            app_env: optional("APP_ENV").unwrap_or_else(default_app_env),
            signature_key: required("SIGNATURE_KEY")?,
            signature_tolerance_seconds: optional("SIGNATURE_TOLERANCE_SECONDS")
                .map(|v| v.parse().map_err(|e| anyhow!("SIGNATURE_TOLERANCE_SECONDS: {}", e)))
                .transpose()?,
            database: DatabaseConfig {
                url: optional("DATABASE_URL"),
                host: optional("DB_HOST").unwrap_or_else(default_db_host),
                port: parsed("DB_PORT", default_db_port())?,
                name: optional("DB_NAME").unwrap_or_default(),
                username: optional("DB_USERNAME").unwrap_or_default(),
                password: optional("DB_PASSWORD").unwrap_or_default(),
                max_open_connections: parsed("DB_MAX_OPEN_CONNECTIONS", default_max_open())?,
                max_idle_connections: parsed("DB_MAX_IDLE_CONNECTIONS", 0)?,
                max_lifetime_connections: parsed("DB_MAX_LIFETIME_CONNECTIONS", 0)?,
                max_idle_time: parsed("DB_MAX_IDLE_TIME", 0)?,
            },
            rate_limiter_max_requests: parsed("RATE_LIMITER_MAX_REQUESTS", 10)?,
            rate_limiter_time_seconds: parsed("RATE_LIMITER_TIME_SECONDS", 60)?,
            rate_limiter_trust_forwarded_for: parsed("RATE_LIMITER_TRUST_FORWARDED_FOR", false)?,
            jwt_secret_key: required("JWT_SECRET_KEY")?,
            jwt_expiration_time: parsed("JWT_EXPIRATION_TIME", 60)?,
        })
    }

    /// Reject configurations the server cannot run safely with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret_key.is_empty() {
            bail!("jwtSecretKey must not be empty");
        }
        if self.signature_key.is_empty() {
            bail!("signatureKey must not be empty");
        }
        if self.rate_limiter_max_requests == 0 || self.rate_limiter_time_seconds == 0 {
            bail!("rate limiter budget must be positive");
        }
        if self.jwt_expiration_time == 0 {
            bail!("jwtExpirationTime must be positive");
        }
        if self.jwt_expiration_time.checked_mul(60).is_none() {
            bail!("jwtExpirationTime is too large");
        }
        if self.database.max_open_connections == 0 {
            bail!("database.maxOpenConnections must be positive");
        }
        Ok(())
    }

    pub fn user_config(&self) -> UserConfig {
        UserConfig {
            jwt_secret: self.jwt_secret_key.as_bytes().to_vec(),
            token_ttl: Duration::from_secs(self.jwt_expiration_time.saturating_mul(60)),
            signature_key: self.signature_key.clone(),
            signature_tolerance: self.signature_tolerance_seconds.map(Duration::from_secs),
            rate_limit: RateLimitConfig::new(
                self.rate_limiter_max_requests,
                self.rate_limiter_time_seconds,
            )
            .with_trusted_proxy(self.rate_limiter_trust_forwarded_for),
            password_hash: PasswordHashParams::default(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .context("invalid database url");
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.username)
            .password(&self.password))
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        let mut options = PgPoolOptions::new()
            .max_connections(self.max_open_connections)
            .min_connections(self.max_idle_connections.min(self.max_open_connections));

        if self.max_lifetime_connections > 0 {
            options = options.max_lifetime(Duration::from_secs(self.max_lifetime_connections));
        }
        if self.max_idle_time > 0 {
            options = options.idle_timeout(Duration::from_secs(self.max_idle_time));
        }

        options
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &str) -> anyhow::Result<String> {
    optional(key).ok_or_else(|| anyhow!("{} must be set", key))
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.parse().map_err(|e| anyhow!("{}: {}", key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "port": 8001,
        "appName": "user-service",
        "appEnv": "production",
        "signatureKey": "sig-key",
        "database": {
            "host": "db",
            "port": 5433,
            "name": "users",
            "username": "postgres",
            "password": "postgres",
            "maxOpenConnections": 20,
            "maxIdleConnections": 5,
            "maxLifetimeConnections": 3600,
            "maxIdleTime": 600
        },
        "rateLimiterMaxRequests": 100,
        "rateLimiterTimeSeconds": 60,
        "jwtSecretKey": "jwt-secret",
        "jwtExpirationTime": 30
    }"#;

    #[test]
    fn test_from_json() {
        let config = AppConfig::from_json(SAMPLE).unwrap();

        assert_eq!(config.port, 8001);
        assert_eq!(config.app_env, "production");
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.max_idle_connections, 5);
        assert!(config.signature_tolerance_seconds.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_user_config() {
        let mut config = AppConfig::from_json(SAMPLE).unwrap();
        config.signature_tolerance_seconds = Some(300);

        let user = config.user_config();

        assert_eq!(user.jwt_secret, b"jwt-secret");
        assert_eq!(user.token_ttl, Duration::from_secs(30 * 60));
        assert_eq!(user.signature_key, "sig-key");
        assert_eq!(user.signature_tolerance, Some(Duration::from_secs(300)));
        assert_eq!(user.rate_limit.max_requests, 100);
        assert_eq!(user.rate_limit.window, Duration::from_secs(60));
        assert!(!user.rate_limit.trust_forwarded_for);

        config.rate_limiter_trust_forwarded_for = true;
        assert!(config.user_config().rate_limit.trust_forwarded_for);
    }

    #[test]
    fn test_validate_rejects_overflowing_expiration() {
        let mut config = AppConfig::from_json(SAMPLE).unwrap();
        config.jwt_expiration_time = u64::MAX;
        assert!(config.validate().is_err());

        config.jwt_expiration_time = u64::MAX / 60;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_secrets() {
        let mut config = AppConfig::from_json(SAMPLE).unwrap();
        config.jwt_secret_key.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_json(SAMPLE).unwrap();
        config.signature_key.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_json(SAMPLE).unwrap();
        config.rate_limiter_max_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_required_key() {
        assert!(AppConfig::from_json(r#"{"port": 8001}"#).is_err());
    }

    #[test]
    fn test_pool_options() {
        let config = AppConfig::from_json(SAMPLE).unwrap();
        let pool = config.database.pool_options();

        assert_eq!(pool.get_max_connections(), 20);
        assert_eq!(pool.get_min_connections(), 5);
        assert_eq!(pool.get_max_lifetime(), Some(Duration::from_secs(3600)));
        assert_eq!(pool.get_idle_timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_connect_options_from_url() {
        let mut config = AppConfig::from_json(SAMPLE).unwrap();
        config.database.url = Some("postgres://app:pw@pg.internal:6543/accounts".to_string());

        let options = config.database.connect_options().unwrap();

        assert_eq!(options.get_host(), "pg.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("accounts"));
    }

    #[test]
    fn test_connect_options_from_fields() {
        let config = AppConfig::from_json(SAMPLE).unwrap();

        let options = config.database.connect_options().unwrap();

        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("users"));
    }
}
