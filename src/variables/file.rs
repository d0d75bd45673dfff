//! JSON-file-backed variable store.
//!
//! File: `~/.bearer-hooks/variables.json` unless configured otherwise. The
//! file holds a single flat JSON object of string values. Every mutation
//! rewrites it through a sibling temp file and a rename, so a crash mid-write
//! leaves the previous contents in place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::variables::VariableStore;

/// Variables persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    vars: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Default file path: `~/.bearer-hooks/variables.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bearer-hooks")
            .join("variables.json")
    }

    /// Open the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let vars = match tokio::fs::read_to_string(&path).await {
            Ok(data) if data.trim().is_empty() => BTreeMap::new(),
            Ok(data) => serde_json::from_str(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        tracing::debug!(path = %path.display(), count = vars.len(), "Opened variable file");
        Ok(Self {
            path,
            vars: RwLock::new(vars),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, vars: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(vars)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl VariableStore for FileStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.vars.read().await.get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        // Hold the write guard across persist so concurrent writers serialize.
        let mut vars = self.vars.write().await;
        vars.insert(name.to_string(), value.to_string());
        self.persist(&vars).await
    }

    async fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let mut vars = self.vars.write().await;
        if vars.remove(name).is_none() {
            return Ok(false);
        }
        self.persist(&vars).await?;
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .vars
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("vars.json")).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(!dir.path().join("vars.json").exists());
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vars.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("auth_token", "abc123").await.unwrap();
        store.set("base", "http://localhost:3000").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("auth_token").await.unwrap().as_deref(),
            Some("abc123")
        );
        assert_eq!(reopened.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("auth_token", "abc123").await.unwrap();
        assert!(store.remove("auth_token").await.unwrap());
        assert!(!store.remove("auth_token").await.unwrap());

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("auth_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
