//! Hook registry for managing and executing lifecycle hooks.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::hooks::hook::{Hook, HookContext, HookError, HookFailureMode, HookPoint};
use crate::http::{Request, Response};

/// Priority given to hooks registered without one.
pub const DEFAULT_PRIORITY: u32 = 100;

/// A registered hook with its priority.
struct HookEntry {
    hook: Arc<dyn Hook>,
    priority: u32,
}

/// Registry that manages hooks and executes them at lifecycle points.
///
/// Hooks are executed in priority order (lower number = higher priority);
/// hooks with equal priority run in registration order.
pub struct HookRegistry {
    hooks: RwLock<Vec<HookEntry>>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Register a hook with default priority (100).
    pub async fn register(&self, hook: Arc<dyn Hook>) {
        self.register_with_priority(hook, DEFAULT_PRIORITY).await;
    }

    /// Register a hook with a specific priority.
    ///
    /// Lower priority number = runs first.
    pub async fn register_with_priority(&self, hook: Arc<dyn Hook>, priority: u32) {
        tracing::debug!(hook = hook.name(), priority, "Registering hook");
        let mut hooks = self.hooks.write().await;
        hooks.push(HookEntry { hook, priority });
        // Stable sort keeps registration order among equal priorities.
        hooks.sort_by_key(|e| e.priority);
    }

    /// Unregister a hook by name. Returns `true` if it was found and removed.
    pub async fn unregister(&self, name: &str) -> bool {
        let mut hooks = self.hooks.write().await;
        let before = hooks.len();
        hooks.retain(|e| e.hook.name() != name);
        hooks.len() < before
    }

    /// List all registered hook names (in priority order).
    pub async fn list(&self) -> Vec<String> {
        let hooks = self.hooks.read().await;
        hooks.iter().map(|e| e.hook.name().to_string()).collect()
    }

    /// Run every `BeforeRequest` hook against `request`, in order.
    ///
    /// Each hook sees the mutations made by the hooks before it.
    pub async fn run_before_request(
        &self,
        request: &mut Request,
        ctx: &HookContext,
    ) -> Result<(), HookError> {
        for hook in self.matching(HookPoint::BeforeRequest).await {
            run_one(hook.as_ref(), hook.on_request(request, ctx)).await?;
        }
        Ok(())
    }

    /// Run every `AfterResponse` hook against `response`, in order.
    pub async fn run_after_response(
        &self,
        response: &Response,
        ctx: &HookContext,
    ) -> Result<(), HookError> {
        for hook in self.matching(HookPoint::AfterResponse).await {
            run_one(hook.as_ref(), hook.on_response(response, ctx)).await?;
        }
        Ok(())
    }

    /// Clone matching hooks and drop the read guard before executing, so a
    /// slow hook does not block register/unregister.
    async fn matching(&self, point: HookPoint) -> Vec<Arc<dyn Hook>> {
        let hooks = self.hooks.read().await;
        hooks
            .iter()
            .filter(|e| e.hook.hook_points().contains(&point))
            .map(|e| e.hook.clone())
            .collect()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_one<F>(hook: &dyn Hook, fut: F) -> Result<(), HookError>
where
    F: Future<Output = Result<(), HookError>>,
{
    let outcome = tokio::time::timeout(hook.timeout(), fut).await;
    settle(hook, outcome)
}

/// Apply the hook's failure mode to the result of one run.
fn settle(
    hook: &dyn Hook,
    outcome: Result<Result<(), HookError>, tokio::time::error::Elapsed>,
) -> Result<(), HookError> {
    let err = match outcome {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(err)) => err,
        Err(_elapsed) => HookError::Timeout {
            timeout: hook.timeout(),
        },
    };

    match hook.failure_mode() {
        HookFailureMode::FailOpen => {
            tracing::warn!(hook = hook.name(), "Hook failed (fail-open): {}", err);
            Ok(())
        }
        HookFailureMode::FailClosed => {
            tracing::warn!(hook = hook.name(), "Hook failed (fail-closed): {}", err);
            Err(err)
        }
    }
}
