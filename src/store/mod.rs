//! User persistence
//!
//! `UserStore` is the contract the dispatcher relies on: fetch by key,
//! insert, full replace, remove. Every method may suspend on I/O and reports
//! failure as a `StoreError` instead of returning a default.
//!
//! Two backends ship with the crate:
//!
//! - `MemoryUserStore` for tests and throwaway runs
//! - `FileUserStore`, an fsync'd append-only log replayed on open

mod checksum;
mod config;
mod errors;
mod file;
mod memory;
mod record;

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::User;

pub use checksum::{compute_checksum, verify_checksum};
pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use file::FileUserStore;
pub use memory::MemoryUserStore;
pub use record::UserRecord;

/// Key-addressed persistence for users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Live record for `key`, if any
    async fn find_by_key(&self, key: &str) -> StoreResult<Option<User>>;

    /// Store a new user. Fails with `DuplicateKey` when `user.sub` is live.
    async fn insert(&self, user: User) -> StoreResult<User>;

    /// Overwrite the record for `user.sub`. Fails with `MissingRecord` when absent.
    async fn replace(&self, user: User) -> StoreResult<User>;

    /// Remove the record for `user.sub`. Fails with `MissingRecord` when absent.
    async fn remove(&self, user: &User) -> StoreResult<()>;
}

#[async_trait]
impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    async fn find_by_key(&self, key: &str) -> StoreResult<Option<User>> {
        (**self).find_by_key(key).await
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        (**self).insert(user).await
    }

    async fn replace(&self, user: User) -> StoreResult<User> {
        (**self).replace(user).await
    }

    async fn remove(&self, user: &User) -> StoreResult<()> {
        (**self).remove(user).await
    }
}

/// Store handle shared by every request
pub type SharedStore = Arc<dyn UserStore>;

/// Open the backend described by `config`
pub fn open(config: &StoreConfig) -> StoreResult<SharedStore> {
    match config {
        StoreConfig::Memory => {
            tracing::info!(backend = "memory", "Opened user store");
            Ok(Arc::new(MemoryUserStore::new()))
        }
        StoreConfig::File { path } => {
            let store = FileUserStore::open(path)?;
            tracing::info!(
                backend = "file",
                path = %path.display(),
                users = store.len()?,
                "Opened user store"
            );
            Ok(Arc::new(store))
        }
    }
}
