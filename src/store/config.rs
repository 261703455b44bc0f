//! Store backend selection

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which backend to open.
///
/// JSON form: `{"backend": "memory"}` or `{"backend": "file", "path": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local map, lost on exit
    Memory,
    /// Durable record log at `path`
    File { path: PathBuf },
}

fn default_path() -> PathBuf {
    PathBuf::from("./data/users.dat")
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: default_path(),
        }
    }
}
