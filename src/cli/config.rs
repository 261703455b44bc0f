//! Service configuration file
//!
//! ```json
//! {
//!   "http": {"host": "0.0.0.0", "port": 8080, "cors_origins": []},
//!   "store": {"backend": "file", "path": "./data/users.dat"},
//!   "dispatch": {"key_param": "id", "duplicate_key": "defer"}
//! }
//! ```
//!
//! Every section and field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::dispatcher::DispatchPolicy;
use crate::http_server::HttpServerConfig;
use crate::store::StoreConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub dispatch: DispatchPolicy,
}

impl ServiceConfig {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    CliError::config_error(format!(
                        "Failed to read config {}: {}",
                        path.display(),
                        e
                    ))
                })?;

                serde_json::from_str(&content)
                    .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?
            }
            None => ServiceConfig::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.dispatch.key_param.is_empty() {
            return Err(CliError::config_error("dispatch.key_param must not be empty"));
        }

        if let StoreConfig::File { path } = &self.store {
            if path.as_os_str().is_empty() {
                return Err(CliError::config_error("store.path must not be empty"));
            }
        }

        self.http
            .validate()
            .map_err(|e| CliError::config_error(e.to_string()))
    }

    /// Apply command-line and environment overrides, then re-validate
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        data_file: Option<PathBuf>,
    ) -> CliResult<Self> {
        if let Some(host) = host {
            self.http.host = host;
        }
        if let Some(port) = port {
            self.http.port = port;
        }
        if let Some(path) = data_file {
            self.store = StoreConfig::File { path };
        }

        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::DuplicateKeyPolicy;
    use std::io::Write;

    #[test]
    fn test_no_path_gives_defaults() {
        let config = ServiceConfig::load(None).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"store": {{"backend": "memory"}}, "dispatch": {{"duplicate_key": "reject"}}}}"#
        )
        .unwrap();

        let config = ServiceConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.dispatch.duplicate_key, DuplicateKeyPolicy::Reject);
        assert_eq!(config.dispatch.key_param, "id");
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ServiceConfig::load(Some(Path::new("/nonexistent/roadie.json"))).unwrap_err();
        assert_eq!(err.code_str(), "USER_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_rejects_empty_key_param() {
        let mut config = ServiceConfig::default();
        config.dispatch.key_param = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_store_path() {
        let config = ServiceConfig {
            store: StoreConfig::File {
                path: PathBuf::new(),
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unusable_cors_origin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"http": {{"cors_origins": ["https://ok.example", "*"]}}}}"#).unwrap();

        let err = ServiceConfig::load(Some(file.path())).unwrap_err();
        assert_eq!(err.code_str(), "USER_CLI_CONFIG_ERROR");
        assert!(err.message().contains("CORS"));
    }

    #[test]
    fn test_overrides_win() {
        let config = ServiceConfig::default()
            .with_overrides(
                Some("127.0.0.1".to_string()),
                Some(3000),
                Some(PathBuf::from("/tmp/u.dat")),
            )
            .unwrap();

        assert_eq!(config.http.socket_addr(), "127.0.0.1:3000");
        assert_eq!(
            config.store,
            StoreConfig::File {
                path: PathBuf::from("/tmp/u.dat")
            }
        );
    }

    #[test]
    fn test_zero_port_override_rejected() {
        let err = ServiceConfig::default()
            .with_overrides(None, Some(0), None)
            .unwrap_err();
        assert!(err.message().contains("port"));
    }
}
