use sea_orm::ConnectOptions;
use std::fmt;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or, env_required};

/// Discrete connection parameters, as handed out by the platform that
/// provisions the database (host, port, credentials, database name).
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParts {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Extra driver options, appended as the URL query string (`sslmode=require`)
    pub options: Option<String>,
}

impl ConnectionParts {
    pub fn to_url(&self) -> String {
        let mut url = format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.database
        );
        if let Some(options) = self.options.as_deref() {
            let options = options.trim_start_matches('?');
            if !options.is_empty() {
                url.push('?');
                url.push_str(options);
            }
        }
        url
    }
}

impl fmt::Debug for ConnectionParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParts")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .field("options", &self.options)
            .finish()
    }
}

/// PostgreSQL pool configuration.
///
/// Loadable from the environment with the `config` feature, either from a
/// full `DATABASE_URL` or from the `DATABASE_HOST`/`DATABASE_PORT`/
/// `DATABASE_USER`/`DATABASE_PASSWORD`/`DATABASE_NAME` set.
#[derive(Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Log every statement through sqlx
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn from_parts(parts: &ConnectionParts) -> Self {
        Self::new(parts.to_url())
    }

    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The connection URL with the password masked, for logs.
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Debug);
        opt
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            sqlx_logging: false,
        }
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("url", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("sqlx_logging", &self.sqlx_logging)
            .finish()
    }
}

fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
        return url.to_string();
    };
    let rest = &url[scheme_end..];
    let Some(at) = rest.rfind('@') else {
        return url.to_string();
    };
    match rest[..at].find(':') {
        Some(colon) => format!(
            "{}{}:****{}",
            &url[..scheme_end],
            &rest[..colon],
            &rest[at..]
        ),
        None => url.to_string(),
    }
}

/// Environment variables:
/// - `DATABASE_URL`, or the discrete set:
///   `DATABASE_HOST`, `DATABASE_PORT` (5432), `DATABASE_USER`,
///   `DATABASE_PASSWORD` (empty), `DATABASE_NAME` (`main`), `DATABASE_OPTION`
/// - `DB_MAX_CONNECTIONS` (10), `DB_MIN_CONNECTIONS` (1)
/// - `DB_CONNECT_TIMEOUT_SECS` (30), `DB_ACQUIRE_TIMEOUT_SECS` (30),
///   `DB_IDLE_TIMEOUT_SECS` (600)
/// - `DB_SQLX_LOGGING` (false)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => ConnectionParts::from_env()?.to_url(),
        };

        let defaults = Self::default();
        Ok(Self {
            url,
            max_connections: env_parse_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_parse_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout_secs: env_parse_or("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs)?,
            acquire_timeout_secs: env_parse_or("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout_secs)?,
            idle_timeout_secs: env_parse_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            sqlx_logging: env_parse_or("DB_SQLX_LOGGING", defaults.sqlx_logging)?,
        })
    }
}

#[cfg(feature = "config")]
impl FromEnv for ConnectionParts {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_required("DATABASE_HOST")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL or DATABASE_HOST".to_string()))?;
        let options = std::env::var("DATABASE_OPTION")
            .ok()
            .filter(|o| !o.trim().is_empty());

        Ok(Self {
            host,
            port: env_parse_or("DATABASE_PORT", 5432u16)?,
            user: env_required("DATABASE_USER")?,
            password: env_or_default("DATABASE_PASSWORD", ""),
            database: env_or_default("DATABASE_NAME", "main"),
            options,
        })
    }
}
