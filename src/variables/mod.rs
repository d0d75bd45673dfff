//! Named variable storage shared between hooks.
//!
//! Hooks never hold state of their own. Everything that has to survive from
//! one request to the next (the bearer token, mostly) lives in a
//! [`VariableStore`] handed to them through the hook context.
//!
//! - [`MemoryStore`]: process-local, used by tests and one-shot clients.
//! - [`FileStore`]: JSON file on disk, so separate CLI runs share a token.
//! - [`seed_from_dotenv`]: preload a store from a `.env`-style file.

pub mod dotenv;
pub mod file;
pub mod memory;
pub mod store;

pub use dotenv::seed_from_dotenv;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::VariableStore;
