//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{non_empty, parse_or};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// CORS settings
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 0,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Load from `SERVER_HOST`, `SERVER_PORT` and `SERVER_WORKERS`
    pub fn from_source<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: non_empty(lookup, "SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or(lookup, "SERVER_PORT", defaults.port),
            workers: parse_or(lookup, "SERVER_WORKERS", defaults.workers),
            cors: CorsConfig::from_source(lookup),
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; only consulted in production, where the empty list
    /// means browsers from other origins are rejected
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Max age for the preflight cache, in seconds
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

impl CorsConfig {
    /// Load from `ALLOWED_ORIGINS` (comma separated) and `CORS_MAX_AGE`
    pub fn from_source<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            allowed_origins,
            max_age: parse_or(lookup, "CORS_MAX_AGE", default_cors_max_age()),
        }
    }
}

fn default_cors_max_age() -> usize {
    3600
}
