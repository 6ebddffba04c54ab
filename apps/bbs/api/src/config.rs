use axum_helpers::RpcCacheConfig;
use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse_or, server::ServerConfig,
};
use database::postgres::PostgresConfig;
use strum::{Display, EnumString};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Where comments are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    #[default]
    Postgres,
    /// Process-local, lost on restart
    Memory,
}

impl StoreKind {
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = env_or_default("STORE", "postgres");
        value.parse().map_err(|_| ConfigError::ParseError {
            key: "STORE".to_string(),
            details: format!("expected 'postgres' or 'memory', got '{value}'"),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreKind,
    /// Set when `store` is Postgres
    pub database: Option<PostgresConfig>,
    pub run_migrations: bool,
    pub cache: RpcCacheConfig,
}

impl Config {
    /// `force_memory` comes from `--in-memory` and wins over `STORE`.
    pub fn from_env(force_memory: bool) -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let store = if force_memory {
            StoreKind::Memory
        } else {
            StoreKind::from_env()?
        };
        let database = match store {
            StoreKind::Postgres => Some(PostgresConfig::from_env()?), // Required for Postgres
            StoreKind::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            store,
            database,
            run_migrations: env_parse_or("RUN_MIGRATIONS", false)?,
            cache: RpcCacheConfig::from_env()?,
        })
    }
}
