//! Core hook types and traits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;
use crate::http::{Request, Response};
use crate::variables::VariableStore;

/// Points in the request lifecycle where hooks can be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HookPoint {
    /// Immediately before a request is dispatched.
    BeforeRequest,
    /// Immediately after a response is received.
    AfterResponse,
}

/// How to handle hook execution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookFailureMode {
    /// On error/timeout, log and continue with the next hook.
    FailOpen,
    /// On error/timeout, abort the chain and surface the error.
    FailClosed,
}

/// Hook execution errors.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Variable store error: {0}")]
    Store(#[from] StoreError),

    #[error("Response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Response JSON has no '{field}' field")]
    MissingToken { field: String },

    #[error("Response field '{field}' is {kind}, expected a string")]
    InvalidToken { field: String, kind: &'static str },

    #[error("Hook execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("Hook timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Context passed to hooks alongside the request or response.
///
/// The variable store is the only channel between hooks; there is no
/// ambient or global state.
#[derive(Clone)]
pub struct HookContext {
    pub variables: Arc<dyn VariableStore>,
}

impl HookContext {
    pub fn new(variables: Arc<dyn VariableStore>) -> Self {
        Self { variables }
    }
}

impl std::fmt::Debug for HookContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookContext").finish_non_exhaustive()
    }
}

/// Trait for implementing lifecycle hooks.
///
/// A hook only receives calls for the points it lists in
/// [`hook_points`](Hook::hook_points); the callback for the other point keeps
/// its default no-op body.
#[async_trait]
pub trait Hook: Send + Sync {
    /// A unique name for this hook.
    fn name(&self) -> &str;

    /// The lifecycle points this hook should be called at.
    fn hook_points(&self) -> &[HookPoint];

    /// How to handle failures in this hook.
    ///
    /// Default: `FailClosed` (errors reach the caller).
    fn failure_mode(&self) -> HookFailureMode {
        HookFailureMode::FailClosed
    }

    /// Maximum time this hook is allowed to run.
    ///
    /// Default: 5 seconds.
    fn timeout(&self) -> Duration {
        Duration::from_secs(5)
    }

    /// Called before the request is sent. May mutate the request.
    async fn on_request(&self, _request: &mut Request, _ctx: &HookContext) -> Result<(), HookError> {
        Ok(())
    }

    /// Called after the response is received.
    async fn on_response(&self, _response: &Response, _ctx: &HookContext) -> Result<(), HookError> {
        Ok(())
    }
}
