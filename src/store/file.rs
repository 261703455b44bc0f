//! Durable file-backed user store
//!
//! The log is append-only: every insert and replace writes the full user,
//! every remove writes a tombstone, and each append is fsync'd before the
//! operation returns. Opening the store replays the log into an in-memory
//! index where the latest record for a key wins. Replay halts on the first
//! record that fails verification; a damaged log is never partially served.
//!
//! The index and the log file sit behind separate locks. Mutations hold the
//! log mutex (on the blocking pool) for the whole check-append-publish
//! sequence and take the index write lock only to publish. Reads take the
//! index read lock only, so they never wait on file I/O.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::{info, warn};

use super::errors::{StoreError, StoreResult};
use super::record::UserRecord;
use super::UserStore;
use crate::model::User;

type UserIndex = HashMap<String, User>;

/// Append-only log store
#[derive(Debug, Clone)]
pub struct FileUserStore {
    index: Arc<RwLock<UserIndex>>,
    log: Arc<Mutex<LogFile>>,
}

#[derive(Debug)]
struct LogFile {
    path: PathBuf,
    file: File,
    /// End of the last acknowledged record
    offset: u64,
    /// A failed append may have left bytes past `offset`
    torn: bool,
}

impl FileUserStore {
    /// Open or create the log at `path`, creating parent directories.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::io(
                    format!("Failed to create store directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                StoreError::io(format!("Failed to open user log: {}", path.display()), e)
            })?;

        let (users, offset) = replay(path)?;

        Ok(Self {
            index: Arc::new(RwLock::new(users)),
            log: Arc::new(Mutex::new(LogFile {
                path: path.to_path_buf(),
                file,
                offset,
                torn: false,
            })),
        })
    }

    /// Number of live users
    pub fn len(&self) -> StoreResult<usize> {
        Ok(read_index(&self.index)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Bytes of log written so far, tombstones and superseded records included
    pub fn log_size(&self) -> StoreResult<u64> {
        Ok(self.log.lock().map_err(|_| StoreError::Poisoned)?.offset)
    }

    /// Rewrite the log with one record per live user.
    ///
    /// The new log is written and fsync'd beside the old one, renamed over
    /// it, and the directory is fsync'd.
    pub async fn compact(&self) -> StoreResult<()> {
        let (before, after) = self
            .mutate(|log, index| {
                let mut bytes = Vec::new();
                for user in read_index(index)?.values() {
                    bytes.extend(UserRecord::put(user)?.serialize());
                }

                let before = log.offset;
                log.install(bytes)?;
                Ok((before, log.offset))
            })
            .await?;

        info!(before, after, "Compacted user log");
        Ok(())
    }

    /// Run `op` with exclusive access to the log, on the blocking pool
    async fn mutate<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut LogFile, &RwLock<UserIndex>) -> StoreResult<T> + Send + 'static,
    {
        let log = Arc::clone(&self.log);
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || {
            let mut log = log.lock().map_err(|_| StoreError::Poisoned)?;
            op(&mut *log, &*index)
        })
        .await?
    }
}

fn read_index(index: &RwLock<UserIndex>) -> StoreResult<RwLockReadGuard<'_, UserIndex>> {
    index.read().map_err(|_| StoreError::Poisoned)
}

fn write_index(index: &RwLock<UserIndex>) -> StoreResult<RwLockWriteGuard<'_, UserIndex>> {
    index.write().map_err(|_| StoreError::Poisoned)
}

impl LogFile {
    /// Append and fsync one record. On failure the log is cut back to
    /// `offset`, so a failed mutation leaves nothing behind.
    fn append(&mut self, record: &UserRecord) -> StoreResult<()> {
        self.repair()?;

        let bytes = record.serialize();
        let written = self
            .file
            .write_all(&bytes)
            .and_then(|()| self.file.sync_all());

        if let Err(e) = written {
            self.torn = true;
            if let Err(repair_err) = self.repair() {
                warn!(offset = self.offset, error = %repair_err, "Torn append left in user log");
            }
            return Err(StoreError::io(
                format!("Failed to append record for key: {}", record.key),
                e,
            ));
        }

        self.offset += bytes.len() as u64;
        Ok(())
    }

    /// Truncate anything a failed append wrote past `offset`
    fn repair(&mut self) -> StoreResult<()> {
        if !self.torn {
            return Ok(());
        }

        self.file
            .set_len(self.offset)
            .and_then(|()| self.file.sync_all())
            .map_err(|e| StoreError::io("Failed to truncate torn append", e))?;

        self.torn = false;
        Ok(())
    }

    /// Replace the log with `bytes`
    fn install(&mut self, bytes: Vec<u8>) -> StoreResult<()> {
        let tmp_path = self.path.with_extension("compact");

        {
            let mut tmp = File::create(&tmp_path).map_err(|e| {
                StoreError::io(format!("Failed to create {}", tmp_path.display()), e)
            })?;
            tmp.write_all(&bytes)
                .and_then(|()| tmp.sync_all())
                .map_err(|e| StoreError::io("Failed to write compacted log", e))?;
        }

        // Open before renaming so a failed open leaves the old log in service
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&tmp_path)
            .map_err(|e| StoreError::io("Failed to open compacted log", e))?;

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io("Failed to install compacted log", e));
        }

        self.file = file;
        self.offset = bytes.len() as u64;
        self.torn = false;

        match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => fsync_dir(parent),
            None => fsync_dir(Path::new(".")),
        }
    }
}

/// fsync a directory so a rename inside it is durable
fn fsync_dir(path: &Path) -> StoreResult<()> {
    let dir = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|e| StoreError::io(format!("Failed to open {}", path.display()), e))?;

    dir.sync_all().map_err(|e| {
        StoreError::io(format!("fsync directory failed: {}", path.display()), e)
    })
}

/// Rebuild the live-user index from the log at `path`
fn replay(path: &Path) -> StoreResult<(UserIndex, u64)> {
    let data = fs::read(path)
        .map_err(|e| StoreError::io(format!("Failed to read user log: {}", path.display()), e))?;

    let mut users = HashMap::new();
    let mut pos = 0usize;

    while pos < data.len() {
        let offset = pos as u64;
        let (record, consumed) = UserRecord::deserialize(&data[pos..])
            .map_err(|e| StoreError::corruption(offset, e.to_string()))?;

        if record.is_tombstone {
            users.remove(&record.key);
        } else {
            let user = record
                .to_user()
                .map_err(|e| StoreError::corruption(offset, format!("Invalid user body: {}", e)))?;
            if user.sub != record.key {
                return Err(StoreError::corruption(
                    offset,
                    format!("Record key {} does not match body key {}", record.key, user.sub),
                ));
            }
            users.insert(record.key, user);
        }

        pos += consumed;
    }

    Ok((users, data.len() as u64))
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn find_by_key(&self, key: &str) -> StoreResult<Option<User>> {
        Ok(read_index(&self.index)?.get(key).cloned())
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        self.mutate(move |log, index| {
            let exists = read_index(index)?.contains_key(&user.sub);
            if exists {
                return Err(StoreError::DuplicateKey(user.sub));
            }
            log.append(&UserRecord::put(&user)?)?;
            write_index(index)?.insert(user.sub.clone(), user.clone());
            Ok(user)
        })
        .await
    }

    async fn replace(&self, user: User) -> StoreResult<User> {
        self.mutate(move |log, index| {
            let exists = read_index(index)?.contains_key(&user.sub);
            if !exists {
                return Err(StoreError::MissingRecord(user.sub));
            }
            log.append(&UserRecord::put(&user)?)?;
            write_index(index)?.insert(user.sub.clone(), user.clone());
            Ok(user)
        })
        .await
    }

    async fn remove(&self, user: &User) -> StoreResult<()> {
        let key = user.sub.clone();
        self.mutate(move |log, index| {
            let exists = read_index(index)?.contains_key(&key);
            if !exists {
                return Err(StoreError::MissingRecord(key));
            }
            log.append(&UserRecord::tombstone(key.clone()))?;
            write_index(index)?.remove(&key);
            Ok(())
        })
        .await
    }
}
