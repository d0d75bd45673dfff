//! HTTP client that runs the hook chain around every exchange.

use std::sync::Arc;

use reqwest::Method;

use crate::config::{ClientConfig, TokenConfig, with_trailing_slash};
use crate::error::{Error, Result};
use crate::hooks::{BearerAuthHook, HookContext, HookRegistry, TokenCaptureHook};
use crate::http::{Header, Request, Response};
use crate::template;
use crate::variables::VariableStore;

/// Runs `BeforeRequest` hooks, sends the request, then runs `AfterResponse`
/// hooks on the result.
///
/// Hook errors abort the exchange: a failing `BeforeRequest` hook means
/// nothing is sent, a failing `AfterResponse` hook means the response is not
/// returned.
pub struct HookedClient {
    http: reqwest::Client,
    hooks: Arc<HookRegistry>,
    ctx: HookContext,
    base_url: Option<url::Url>,
}

impl HookedClient {
    /// Build a client with an empty hook registry.
    pub fn new(config: &ClientConfig, variables: Arc<dyn VariableStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            hooks: Arc::new(HookRegistry::new()),
            ctx: HookContext::new(variables),
            base_url: config.base_url.clone().map(with_trailing_slash),
        })
    }

    /// Build a client with [`BearerAuthHook`] and [`TokenCaptureHook`]
    /// registered for `token`.
    pub async fn with_bearer_hooks(
        config: &ClientConfig,
        token: &TokenConfig,
        variables: Arc<dyn VariableStore>,
    ) -> Result<Self> {
        let client = Self::new(config, variables)?;
        client
            .hooks
            .register(Arc::new(BearerAuthHook::new(&token.variable)))
            .await;
        client
            .hooks
            .register(Arc::new(
                TokenCaptureHook::new(&token.variable, &token.field)
                    .with_success_status(token.success_status),
            ))
            .await;
        Ok(client)
    }

    pub fn hooks(&self) -> &Arc<HookRegistry> {
        &self.hooks
    }

    pub fn variables(&self) -> &Arc<dyn VariableStore> {
        &self.ctx.variables
    }

    /// Send one request through the hook chain.
    pub async fn send(&self, mut request: Request) -> Result<Response> {
        template::expand_request(&mut request, self.ctx.variables.as_ref()).await?;
        self.hooks.run_before_request(&mut request, &self.ctx).await?;

        let response = self.dispatch(&request).await?;
        tracing::info!(
            method = %request.method,
            url = %request.url,
            status = response.status_code,
            "Request completed"
        );

        self.hooks.run_after_response(&response, &self.ctx).await?;
        Ok(response)
    }

    /// Resolve `raw` against the base URL when it is relative.
    fn resolve_url(&self, raw: &str) -> Result<url::Url> {
        let resolved = match (url::Url::parse(raw), &self.base_url) {
            (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => {
                base.join(raw.trim_start_matches('/'))
            }
            (parsed, _) => parsed,
        };
        resolved.map_err(|e| Error::InvalidRequest(format!("invalid URL '{raw}': {e}")))
    }

    async fn dispatch(&self, request: &Request) -> Result<Response> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
            Error::InvalidRequest(format!("invalid HTTP method '{}'", request.method))
        })?;
        let url = self.resolve_url(&request.url)?;

        let mut builder = self.http.request(method, url);
        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let res = builder.send().await?;
        let status_code = res.status().as_u16();
        let headers = res
            .headers()
            .iter()
            .map(|(name, value)| {
                Header::new(name.as_str(), String::from_utf8_lossy(value.as_bytes()))
            })
            .collect();
        let text = res.text().await?;

        Ok(Response {
            status_code,
            headers,
            text,
        })
    }
}
