use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::{ContentSource, SourceInfo};
use crate::error::{Error, Result};

/// Largest slice of an error body kept in `Error::RemoteError`
const MAX_ERROR_BODY: usize = 512;

/// quran.com v4 REST API over HTTP
pub struct HttpSource {
    client: Client,
    /// Base URL for the API (e.g., "https://api.quran.com/api/v4")
    pub base_url: String,
}

impl HttpSource {
    /// Create a source with the given base URL and per-request timeout.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quran-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::HttpClientInit(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "quran.com",
            base_url: self.base_url.clone(),
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                Error::RemoteUnavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            warn!("API error: {} - {}", status, body);
            return Err(Error::RemoteError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}
