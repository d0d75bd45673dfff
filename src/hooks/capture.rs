//! Response hook that captures a token from a successful JSON response.

use async_trait::async_trait;
use serde_json::Value;

use crate::hooks::bearer::DEFAULT_TOKEN_VARIABLE;
use crate::hooks::hook::{Hook, HookContext, HookError, HookPoint};
use crate::http::Response;

/// Response field holding the token unless told otherwise.
pub const DEFAULT_TOKEN_FIELD: &str = "token";

/// Status code that triggers a capture unless told otherwise.
pub const DEFAULT_SUCCESS_STATUS: u16 = 200;

/// Stores the token from a success response into the token variable.
///
/// Only an exact status match triggers a capture; every other status is
/// ignored. On a match the body must be JSON carrying the token field,
/// anything else is an error. Nothing is stored on error.
///
/// `field` is either a top-level key (`token`) or a JSON pointer
/// (`/data/token`).
pub struct TokenCaptureHook {
    variable: String,
    field: String,
    success_status: u16,
}

impl TokenCaptureHook {
    pub fn new(variable: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            field: field.into(),
            success_status: DEFAULT_SUCCESS_STATUS,
        }
    }

    pub fn with_success_status(mut self, status: u16) -> Self {
        self.success_status = status;
        self
    }

    /// Pull the token out of a parsed body.
    fn extract(&self, body: &Value) -> Result<String, HookError> {
        let found = if self.field.starts_with('/') {
            body.pointer(&self.field)
        } else {
            body.get(&self.field)
        };

        let invalid = |kind| HookError::InvalidToken {
            field: self.field.clone(),
            kind,
        };
        match found {
            None => Err(HookError::MissingToken {
                field: self.field.clone(),
            }),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
            Some(Value::Null) => Err(invalid("null")),
            Some(Value::Array(_)) => Err(invalid("an array")),
            Some(Value::Object(_)) => Err(invalid("an object")),
        }
    }
}

impl Default for TokenCaptureHook {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VARIABLE, DEFAULT_TOKEN_FIELD)
    }
}

#[async_trait]
impl Hook for TokenCaptureHook {
    fn name(&self) -> &str {
        "builtin:token_capture"
    }

    fn hook_points(&self) -> &[HookPoint] {
        &[HookPoint::AfterResponse]
    }

    async fn on_response(&self, response: &Response, ctx: &HookContext) -> Result<(), HookError> {
        if response.status_code != self.success_status {
            tracing::debug!(status = response.status_code, "Non-success status, token left alone");
            return Ok(());
        }

        let body: Value = serde_json::from_str(&response.text)?;
        let token = self.extract(&body)?;

        ctx.variables.set(&self.variable, &token).await?;

        let stored = ctx.variables.get(&self.variable).await?.unwrap_or_default();
        tracing::info!(variable = %self.variable, value = %stored, "Captured token");
        Ok(())
    }
}
