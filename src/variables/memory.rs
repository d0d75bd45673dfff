//! In-memory variable store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::variables::VariableStore;

/// Variables kept in process memory. Lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vars: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `vars`.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: RwLock::new(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.vars.read().await.get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.vars
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.vars.write().await.remove(name).is_some())
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
