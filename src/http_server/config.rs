//! HTTP host settings
//!
//! ```json
//! {"host": "127.0.0.1", "port": 8080, "cors_origins": ["https://admin.example.com"]}
//! ```
//!
//! An empty `cors_origins` list allows any origin.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HttpConfigError {
    #[error("http.port must be > 0")]
    ZeroPort,

    #[error("http.host must not be empty")]
    EmptyHost,

    #[error("Invalid CORS origin {0:?}")]
    InvalidOrigin(String),

    #[error("CORS origin \"*\" is not allowed in a list; leave cors_origins empty to allow any origin")]
    WildcardOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Listen on `port` on all interfaces
    pub fn on_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// `host:port`, as handed to the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed CORS origins. Every entry must be a valid header value and
    /// none may be the wildcard.
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>, HttpConfigError> {
        self.cors_origins
            .iter()
            .map(|origin| {
                if origin.trim() == "*" {
                    return Err(HttpConfigError::WildcardOrigin);
                }
                HeaderValue::from_str(origin)
                    .map_err(|_| HttpConfigError::InvalidOrigin(origin.clone()))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), HttpConfigError> {
        if self.port == 0 {
            return Err(HttpConfigError::ZeroPort);
        }
        if self.host.trim().is_empty() {
            return Err(HttpConfigError::EmptyHost);
        }
        self.allowed_origins()?;
        Ok(())
    }
}
