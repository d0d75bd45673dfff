//! Request hook that attaches the stored bearer token.

use async_trait::async_trait;

use crate::hooks::hook::{Hook, HookContext, HookError, HookPoint};
use crate::http::{Header, Request};

/// Variable the token hooks read and write unless told otherwise.
pub const DEFAULT_TOKEN_VARIABLE: &str = "auth_token";

/// Appends `Authorization: Bearer <token>` to every outgoing request.
///
/// If the token variable has never been set it is initialized to the empty
/// string first, so the very first request goes out as `Bearer ` with no
/// token. Servers that answer that with a login challenge keep working; the
/// header is always present.
///
/// The header is appended, never replaced: a request that already carries an
/// `Authorization` header leaves with two.
pub struct BearerAuthHook {
    variable: String,
}

impl BearerAuthHook {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl Default for BearerAuthHook {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VARIABLE)
    }
}

#[async_trait]
impl Hook for BearerAuthHook {
    fn name(&self) -> &str {
        "builtin:bearer_auth"
    }

    fn hook_points(&self) -> &[HookPoint] {
        &[HookPoint::BeforeRequest]
    }

    async fn on_request(&self, request: &mut Request, ctx: &HookContext) -> Result<(), HookError> {
        let store = &ctx.variables;

        if store.get(&self.variable).await?.is_none() {
            tracing::debug!(variable = %self.variable, "Token variable unset, initializing empty");
            store.init(&self.variable).await?;
        }

        let token = store.get(&self.variable).await?.unwrap_or_default();
        request
            .headers
            .push(Header::new("Authorization", format!("Bearer {token}")));

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            has_token = !token.is_empty(),
            "Attached bearer token"
        );
        Ok(())
    }
}
