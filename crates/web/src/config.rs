//! Process configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `DATABASE_URL` | unset: seeded in-memory catalog |
//! | `DATABASE_MAX_CONNECTIONS` | `10` |
//! | `SERVER_URL` | `http://localhost:8080` |
//! | `POPULAR_REVALIDATE_SECS` | `86400` |
//! | `QUERY_CACHE_CAPACITY` | `1024` (must be positive) |
//! | `PRODUCT_FILES_DIR` | `.` |
//! | `SEED_DEMO_DATA` | `false` (always on for the in-memory catalog) |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use storefront_infra::listings::POPULAR_REVALIDATE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Absolute base for links in emails.
    pub server_url: String,
    pub popular_revalidate: Duration,
    pub query_cache_capacity: u64,
    /// Directory that product `file_path`s are resolved against.
    pub product_files_dir: PathBuf,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: None,
            database_max_connections: 10,
            server_url: "http://localhost:8080".to_string(),
            popular_revalidate: POPULAR_REVALIDATE,
            query_cache_capacity: 1024,
            product_files_dir: PathBuf::from("."),
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or blank variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Ok(Self {
            bind_addr: parse(get("BIND_ADDR"), "BIND_ADDR", "socket address")?
                .unwrap_or(defaults.bind_addr),
            database_url: get("DATABASE_URL"),
            database_max_connections: parse(
                get("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                "connection count",
            )?
            .unwrap_or(defaults.database_max_connections),
            server_url: get("SERVER_URL").unwrap_or(defaults.server_url),
            popular_revalidate: parse::<u64>(
                get("POPULAR_REVALIDATE_SECS"),
                "POPULAR_REVALIDATE_SECS",
                "number of seconds",
            )?
            .map(Duration::from_secs)
            .unwrap_or(defaults.popular_revalidate),
            query_cache_capacity: parse_positive(
                get("QUERY_CACHE_CAPACITY"),
                "QUERY_CACHE_CAPACITY",
                "positive entry count",
            )?
            .unwrap_or(defaults.query_cache_capacity),
            product_files_dir: get("PRODUCT_FILES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.product_files_dir),
            seed_demo_data: parse_flag(get("SEED_DEMO_DATA"), "SEED_DEMO_DATA")?
                .unwrap_or(defaults.seed_demo_data),
        })
    }
}

fn parse<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| {
            v.parse::<T>().map_err(|_| ConfigError::Invalid {
                name,
                value: v.clone(),
                expected,
            })
        })
        .transpose()
}

fn parse_positive(
    value: Option<String>,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match parse::<u64>(value.clone(), name, expected)? {
        Some(0) => Err(ConfigError::Invalid {
            name,
            value: value.unwrap_or_default(),
            expected,
        }),
        other => Ok(other),
    }
}

fn parse_flag(value: Option<String>, name: &'static str) -> Result<Option<bool>, ConfigError> {
    value
        .map(|v| match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                value: v,
                expected: "boolean",
            }),
        })
        .transpose()
}
