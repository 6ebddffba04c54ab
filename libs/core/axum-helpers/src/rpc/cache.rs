use axum::http::HeaderValue;
use core_config::{ConfigError, FromEnv, env_parse_or};

use super::codes::ProcedureKind;
use super::response::RpcResponse;

/// Edge cache lifetimes for cacheable responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcCacheConfig {
    /// Seconds a shared cache may serve the response
    pub s_maxage: u32,
    /// Seconds a stale response may be served while the edge refetches
    pub stale_while_revalidate: u32,
}

impl Default for RpcCacheConfig {
    fn default() -> Self {
        Self {
            s_maxage: 30,
            stale_while_revalidate: 0,
        }
    }
}

impl FromEnv for RpcCacheConfig {
    /// - RPC_CACHE_S_MAXAGE: defaults to 30
    /// - RPC_CACHE_STALE_WHILE_REVALIDATE: defaults to 0
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            s_maxage: env_parse_or("RPC_CACHE_S_MAXAGE", defaults.s_maxage)?,
            stale_while_revalidate: env_parse_or(
                "RPC_CACHE_STALE_WHILE_REVALIDATE",
                defaults.stale_while_revalidate,
            )?,
        })
    }
}

/// Decides which responses the edge may cache.
///
/// A response is cacheable only when every called path starts with a public
/// prefix, no call failed, and the request was a query. Everything else goes
/// out without `cache-control` and is forwarded uncached.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCachePolicy {
    public_prefixes: Vec<String>,
    config: RpcCacheConfig,
}

impl RpcCachePolicy {
    pub fn new<I, S>(public_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            public_prefixes: public_prefixes.into_iter().map(Into::into).collect(),
            config: RpcCacheConfig::default(),
        }
    }

    /// A policy that never marks anything cacheable.
    pub fn disabled() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn with_config(mut self, config: RpcCacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_cacheable(&self, response: &RpcResponse) -> bool {
        let mut paths = response.paths().peekable();
        paths.peek().is_some()
            && paths.all(|p| self.is_public(p))
            && !response.has_errors()
            && response.kind == Some(ProcedureKind::Query)
    }

    pub fn header_value(&self, response: &RpcResponse) -> Option<HeaderValue> {
        if !self.is_cacheable(response) {
            return None;
        }
        HeaderValue::from_str(&format!(
            "s-maxage={}, stale-while-revalidate={}",
            self.config.s_maxage, self.config.stale_while_revalidate
        ))
        .ok()
    }
}
