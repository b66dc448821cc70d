//! Server configuration from environment variables.

use std::time::Duration;

use optionhub_core::defaults;
use optionhub_core::events::ATTRIBUTE_VALUE_TOPIC;
use optionhub_core::{Error, Result, SearchPolicy};
use optionhub_db::PoolConfig;

/// Outbound event delivery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventConfig {
    pub topic: String,
    /// HTTP sink; `None` keeps events on the in-process bus.
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub timeout: Duration,
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub connect_retry: Duration,
    pub run_migrations: bool,
    pub search: SearchPolicy,
    pub events: EventConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let search = SearchPolicy::new(
            parse_or(&get, "SEARCH_MIN_QUERY_LEN", defaults::SEARCH_MIN_QUERY_LEN)?,
            parse_or(&get, "SEARCH_RESULT_LIMIT", defaults::SEARCH_RESULT_LIMIT)?,
        );
        if search.result_limit <= 0 {
            return Err(Error::Config(
                "SEARCH_RESULT_LIMIT must be positive".to_string(),
            ));
        }

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            host: get("HOST").unwrap_or_else(|| defaults::HOST.to_string()),
            port: parse_or(&get, "PORT", defaults::PORT)?,
            max_connections: parse_or(
                &get,
                "DB_MAX_CONNECTIONS",
                optionhub_db::pool::DEFAULT_MAX_CONNECTIONS,
            )?,
            connect_attempts: parse_or(&get, "DB_CONNECT_ATTEMPTS", defaults::DB_CONNECT_ATTEMPTS)?,
            connect_retry: Duration::from_millis(parse_or(
                &get,
                "DB_CONNECT_RETRY_MS",
                defaults::DB_CONNECT_RETRY_MS,
            )?),
            run_migrations: parse_bool_or(&get, "RUN_MIGRATIONS", true)?,
            search,
            events: EventConfig {
                topic: get("EVENT_TOPIC").unwrap_or_else(|| ATTRIBUTE_VALUE_TOPIC.to_string()),
                webhook_url: get("EVENT_WEBHOOK_URL"),
                webhook_secret: get("EVENT_WEBHOOK_SECRET"),
                timeout: Duration::from_secs(parse_or(
                    &get,
                    "EVENT_TIMEOUT_SECS",
                    defaults::EVENT_TIMEOUT_SECS,
                )?),
            },
        })
    }

    /// Pool settings derived from this configuration.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.max_connections)
            .retry(self.connect_attempts, self.connect_retry)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &str, default: bool) -> Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) if v == "false" || v == "0" => Ok(false),
        Some(v) => Err(Error::Config(format!("{}={:?}: expected true/false", key, v))),
    }
}
