//! Lifecycle hooks around an HTTP exchange.
//!
//! Two interception points:
//!
//! - **BeforeRequest** — just before a request is dispatched
//! - **AfterResponse** — just after its response is received
//!
//! Hooks are executed in priority order (lower number = higher priority).
//! They share state only through the [`VariableStore`](crate::variables::VariableStore)
//! in their [`HookContext`].
//!
//! Built in: [`BearerAuthHook`] attaches the stored token to every request,
//! [`TokenCaptureHook`] stores the token from a successful login response.

pub mod bearer;
pub mod capture;
pub mod hook;
pub mod registry;

pub use bearer::{BearerAuthHook, DEFAULT_TOKEN_VARIABLE};
pub use capture::{DEFAULT_SUCCESS_STATUS, DEFAULT_TOKEN_FIELD, TokenCaptureHook};
pub use hook::{Hook, HookContext, HookError, HookFailureMode, HookPoint};
pub use registry::HookRegistry;
