//! Bearer-token hooks for an HTTP API client.
//!
//! Two hooks share one named variable:
//!
//! - [`hooks::BearerAuthHook`] appends `Authorization: Bearer <token>` to
//!   every outgoing request, initializing the token to `""` on first use.
//! - [`hooks::TokenCaptureHook`] stores the `token` field of every 200 JSON
//!   response.
//!
//! The host side is explicit: hooks receive a [`hooks::HookContext`] carrying
//! a [`variables::VariableStore`], and [`client::HookedClient`] drives a
//! [`hooks::HookRegistry`] around a `reqwest` transport.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod http;
pub mod template;
pub mod variables;

pub use client::HookedClient;
pub use config::Config;
pub use error::{ConfigError, Error, StoreError};
pub use hooks::{BearerAuthHook, Hook, HookContext, HookError, HookRegistry, TokenCaptureHook};
pub use http::{Header, Request, Response};
pub use variables::{FileStore, MemoryStore, VariableStore};
