//! reqwest implementation of [`Backend`].
//!
//! All calls share one `reqwest::Client` and resolve paths against
//! `<backend root>/api`. No timeouts are configured: chat and report requests
//! run to completion or error.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::backend::{Backend, BackendError, validation_message};
use super::types::{ChatEnvelope, ChatRequest, LedgerSummary, ReportReceipt, ReportRequest};

pub struct HttpBackend {
    api_base: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// `backend_url` is the configured root; `/api` is appended here.
    /// An empty root is accepted and surfaces later as request failures.
    pub fn new(backend_url: &str) -> Self {
        Self {
            api_base: format!("{}/api", backend_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        read_json(path, response).await
    }

    async fn get_text(&self, path: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        read_body(path, response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, BackendError> {
        let body = self.get_text(path).await?;
        decode(path, &body)
    }
}

async fn read_json<R: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<R, BackendError> {
    let body = read_body(path, response).await?;
    decode(path, &body)
}

fn decode<R: DeserializeOwned>(path: &str, body: &str) -> Result<R, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Parse(format!("{path}: {e}")))
}

/// Body of a 2xx response; any other status becomes a [`BackendError`].
async fn read_body(path: &str, response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status();
    debug!("{} responded with {}", path, status);

    let body = response
        .text()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;

    if status.as_u16() == 422 {
        warn!("{} validation failure: {}", path, body);
        return Err(BackendError::Validation {
            message: validation_message(&body),
            body,
        });
    }

    if !status.is_success() {
        warn!("{} API error: {} - {}", path, status.as_u16(), body);
        return Err(BackendError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatEnvelope, BackendError> {
        info!(
            "POST {}/chat with {} messages",
            self.api_base,
            request.messages.len()
        );
        self.post_json("/chat", request).await
    }

    async fn log_report(&self, request: &ReportRequest) -> Result<ReportReceipt, BackendError> {
        info!(
            "POST {}/log_report ({} bytes)",
            self.api_base,
            request.report_summary.len()
        );
        self.post_json("/log_report", request).await
    }

    async fn ledger(&self) -> Result<LedgerSummary, BackendError> {
        self.get_json("/blockchain").await
    }

    /// A 2xx body that is not JSON comes back as a JSON string, so any
    /// non-empty successful answer reads as truthy.
    async fn probe(&self) -> Result<Value, BackendError> {
        let body = self.get_text("/").await?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body)))
    }
}
