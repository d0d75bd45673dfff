//! The variable store trait.

use async_trait::async_trait;

use crate::error::StoreError;

/// Host-owned mapping from variable names to string values.
///
/// Implementations must be safe to share across hook invocations; each call
/// is atomic on its own but no ordering across calls is promised.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Look up a variable. `Ok(None)` means it was never set.
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Set (or overwrite) a variable.
    async fn set(&self, name: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a variable. Returns `true` if it existed.
    async fn remove(&self, name: &str) -> Result<bool, StoreError>;

    /// All variables, sorted by name.
    async fn list(&self) -> Result<Vec<(String, String)>, StoreError>;

    /// Initialize a variable to the empty string.
    async fn init(&self, name: &str) -> Result<(), StoreError> {
        self.set(name, "").await
    }
}
