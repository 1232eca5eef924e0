//! Network exchange with the remote ILS.
//!
//! One exchange per call with a bounded timeout; retries, if any, belong to
//! the adapter. No state is retained between calls.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{IlsError, IlsResult};
use crate::ncip::parser;

/// Seam between the adapter and the network. Mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request document and return the raw response body
    async fn exchange(&self, body: &str) -> IlsResult<String>;
}

/// HTTP POST transport for XML message protocols
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: &str, timeout_secs: u64) -> IlsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| IlsError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, body: &str) -> IlsResult<String> {
        tracing::debug!("sending request to {}: {}", self.url, body);

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/xml; charset=UTF-8")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| IlsError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IlsError::Transport(e.to_string()))?;

        if !status.is_success() {
            // Error bodies sometimes carry a protocol problem envelope with
            // a better diagnosis than the bare status code
            let detail = parser::describe_problem(&text)
                .unwrap_or_else(|| format!("status {}", status));
            tracing::warn!("HTTP error from {}: {}", self.url, detail);
            return Err(IlsError::Transport(format!("HTTP error: {}", detail)));
        }

        tracing::debug!("received response: {}", text);
        Ok(text)
    }
}
