//! `send` command: one request through the token hooks.

use std::sync::Arc;

use clap::Args;

use crate::client::HookedClient;
use crate::config::Config;
use crate::http::{Header, Request, Response};
use crate::variables::VariableStore;

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// HTTP method (GET, POST, ...)
    pub method: String,

    /// Absolute URL, or a path joined onto the base URL.
    /// `$name` and `${name}` expand from stored variables.
    pub url: String,

    /// Extra header, as 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(short, long, conflicts_with = "json")]
    pub body: Option<String>,

    /// JSON request body; also sets Content-Type: application/json
    #[arg(long)]
    pub json: Option<String>,

    /// Print response headers
    #[arg(short, long)]
    pub include: bool,
}

impl SendArgs {
    /// Build the request these arguments describe.
    pub fn to_request(&self) -> anyhow::Result<Request> {
        let mut request = Request::new(&self.method, &self.url);
        for line in &self.headers {
            request.headers.push(Header::parse(line)?);
        }

        if let Some(json) = &self.json {
            serde_json::from_str::<serde_json::Value>(json)
                .map_err(|e| anyhow::anyhow!("--json is not valid JSON: {}", e))?;
            request
                .headers
                .push(Header::new("Content-Type", "application/json"));
            request.body = Some(json.clone());
        } else {
            request.body = self.body.clone();
        }
        Ok(request)
    }
}

pub async fn run_send_command(
    args: SendArgs,
    config: &Config,
    store: Arc<dyn VariableStore>,
) -> anyhow::Result<()> {
    let request = args.to_request()?;
    let client = HookedClient::with_bearer_hooks(&config.client, &config.token, store).await?;

    let response = client.send(request).await?;
    print!("{}", render(&response, args.include));
    Ok(())
}

fn render(response: &Response, include_headers: bool) -> String {
    let mut out = format!("HTTP {}\n", response.status_code);
    if include_headers {
        for header in &response.headers {
            out.push_str(&format!("{}: {}\n", header.name, header.value));
        }
    }
    out.push('\n');
    out.push_str(&response.text);
    if !response.text.ends_with('\n') {
        out.push('\n');
    }
    out
}
