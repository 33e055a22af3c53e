use crate::core::{AppError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub migrate_legacy_deductions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub rate_limit_per_minute: u32,
    pub login_max_attempts: u32,
    pub login_window: Duration,
    pub session_ttl: Duration,
    pub cors_allowed_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub dre_ttl: Duration,
    pub role_ttl: Duration,
}

/// Parse an optional environment variable, falling back to `default` when unset
pub(crate) fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        Err(_) => Ok(default),
    }
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

impl SecurityConfig {
    pub fn from_env() -> Result<Self> {
        Ok(SecurityConfig {
            rate_limit_per_minute: parse_env("RATE_LIMIT_PER_MINUTE", 1000)?,
            login_max_attempts: parse_env("LOGIN_MAX_ATTEMPTS", 5)?,
            login_window: Duration::from_secs(parse_env("LOGIN_WINDOW_SECONDS", 900)?),
            session_ttl: Duration::from_secs(parse_env::<u64>("SESSION_TTL_HOURS", 12)? * 3600),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok().filter(|o| !o.is_empty()),
        })
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 1000,
            login_max_attempts: 5,
            login_window: Duration::from_secs(900),
            session_ttl: Duration::from_secs(12 * 3600),
            cors_allowed_origin: None,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self> {
        Ok(CacheConfig {
            dre_ttl: Duration::from_secs(parse_env("DRE_CACHE_TTL_SECONDS", 300)?),
            role_ttl: Duration::from_secs(parse_env("ROLE_CACHE_TTL_SECONDS", 300)?),
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dre_ttl: Duration::from_secs(300),
            role_ttl: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: LogFormat::from_env(),
                migrate_legacy_deductions: parse_env("MIGRATE_LEGACY_DEDUCTIONS", false)?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            security: SecurityConfig::from_env()?,
            cache: CacheConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        if self.security.login_max_attempts == 0 {
            return Err(AppError::Configuration(
                "LOGIN_MAX_ATTEMPTS must be greater than 0".to_string(),
            ));
        }

        if self.security.session_ttl.is_zero() {
            return Err(AppError::Configuration(
                "SESSION_TTL_HOURS must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "SERVER_WORKERS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
