//! JSON-file backed key-value store.
//!
//! The whole map is rewritten on every mutation using a temp file + rename, so
//! a crash leaves either the old or the new file, never a mix. The in-memory
//! copy is only replaced after the rename succeeds.

use super::KeyValueStore;
use crate::error::StoreError;

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::panic::Location;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::RwLock;

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl FileKeyValueStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. The parent directory is created on
    /// the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] or [`StoreError::Parse`] when the file exists
    /// but cannot be read or is not a JSON object of strings.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => Entries::new(),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
                    path: path.clone(),
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file {} not found, starting empty", path.display());
                Entries::new()
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: path.clone(),
                    source: e,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        info!(
            "Opened key-value store at {} ({} keys)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the entries, persist it, then swap it in.
    async fn mutate<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        change(&mut next);

        if next == *entries {
            return Ok(());
        }

        persist(&self.path, &next).await?;
        *entries = next;
        Ok(())
    }
}

async fn persist(path: &Path, entries: &Entries) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::Write {
                path: parent.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;
    }

    let json = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Serialize {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    tokio::fs::write(&temp_path, json)
        .await
        .map_err(|e| StoreError::Write {
            path: temp_path.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.mutate(|entries| {
            entries.remove(key);
        })
        .await
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        let entries = self.entries.read().await;
        Ok(keys.iter().map(|key| entries.get(*key).cloned()).collect())
    }

    async fn set_many(&self, new_entries: &[(&str, &str)]) -> Result<(), StoreError> {
        self.mutate(|entries| {
            for (key, value) in new_entries {
                entries.insert(key.to_string(), value.to_string());
            }
        })
        .await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.mutate(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
        .await
    }
}
