//! Environment configuration

use std::path::PathBuf;

use thiserror::Error;
use todo_core::appwrite::{AppwriteConfig, DEFAULT_ENDPOINT};
use todo_core::ops::ReorderOptions;
use todo_core::task::{UnknownStatusPolicy, DEFAULT_ORDER_OFFSET};

/// Largest accepted `ORDER_OFFSET`; keeps order values far from `i64::MAX`
pub const MAX_ORDER_OFFSET: i64 = 1_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Which backend the handlers talk to
#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    Appwrite(AppwriteConfig),
    Memory { seed: Option<PathBuf> },
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Appwrite(_) => "appwrite",
            Self::Memory { .. } => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionConfig {
    pub backend: BackendConfig,
    pub bucket_id: Option<String>,
    pub reorder: ReorderOptions,
    pub port: u16,
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

impl FunctionConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let backend = match get("BACKEND").as_deref().map(str::trim) {
            None | Some("appwrite") => {
                let mut appwrite = AppwriteConfig::new(
                    require("APPWRITE_PROJECT_ID")?,
                    require("APPWRITE_DATABASE_ID")?,
                    require("APPWRITE_COLLECTION_ID")?,
                )
                .with_endpoint(
                    get("APPWRITE_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                );
                if let Some(key) = get("APPWRITE_API_KEY") {
                    appwrite = appwrite.with_api_key(key);
                }
                BackendConfig::Appwrite(appwrite)
            }
            Some("memory") => BackendConfig::Memory {
                seed: get("MEMORY_SEED").map(PathBuf::from),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let offset = match get("ORDER_OFFSET") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|offset| (1..=MAX_ORDER_OFFSET).contains(offset))
                .ok_or(ConfigError::Invalid {
                    name: "ORDER_OFFSET",
                    value: raw,
                })?,
            None => DEFAULT_ORDER_OFFSET,
        };

        let unknown_status = if parse_flag(get("KEEP_UNKNOWN_STATUSES"), false) {
            UnknownStatusPolicy::Trailing
        } else {
            UnknownStatusPolicy::Drop
        };

        let port: u16 = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => 3000,
        };

        Ok(Self {
            backend,
            bucket_id: get("APPWRITE_BUCKET_ID"),
            reorder: ReorderOptions {
                offset,
                unknown_status,
            },
            port,
        })
    }
}
