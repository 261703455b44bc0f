//! In-memory user store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::errors::{StoreError, StoreResult};
use super::UserStore;
use crate::model::User;

/// `HashMap`-backed store.
///
/// Enforces the same key uniqueness a database primary key would, so the
/// dispatcher sees identical failure modes against either backend.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|u| (u.sub.clone(), u)).collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Number of live users
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.users.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_key(&self, key: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.get(key).cloned())
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned)?;
        if users.contains_key(&user.sub) {
            return Err(StoreError::DuplicateKey(user.sub));
        }
        users.insert(user.sub.clone(), user.clone());
        Ok(user)
    }

    async fn replace(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned)?;
        match users.get_mut(&user.sub) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(StoreError::MissingRecord(user.sub)),
        }
    }

    async fn remove(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned)?;
        users
            .remove(&user.sub)
            .map(|_| ())
            .ok_or_else(|| StoreError::MissingRecord(user.sub.clone()))
    }
}
