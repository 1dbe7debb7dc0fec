//! HTTP plumbing shared by the geocoding and routing adapters.

mod basic;
mod header;

pub use basic::BasicClient;
pub use header::WithHeader;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Request, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Executes a prepared request. Wrappers such as [`WithHeader`] decorate an
/// inner client before delegating to it.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// GETs `url` and returns the body. Non-2xx responses are errors carrying the
/// status and body text.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: Url) -> Result<Vec<u8>> {
    let req = Request::new(reqwest::Method::GET, url);
    let resp = client.execute(req).await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("request returned status {}: {}", status, body));
    }

    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), %status, "Response received");
    Ok(bytes.to_vec())
}

/// [`fetch_bytes`] followed by JSON decoding into `T`.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: Url) -> Result<T> {
    let bytes = fetch_bytes(client, url).await?;
    serde_json::from_slice(&bytes).map_err(|e| anyhow!("Failed to parse response: {}", e))
}
