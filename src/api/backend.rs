use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{ChatEnvelope, ChatRequest, LedgerSummary, ReportReceipt, ReportRequest};

/// Shown when a 422 carries neither `detail[0].msg` nor a usable `detail`.
pub const GENERIC_VALIDATION_MESSAGE: &str = "Invalid message format. Please try again.";

/// Errors returned by backend calls.
#[derive(Debug)]
pub enum BackendError {
    /// Transport-level failure (invalid URL, DNS, connection refused, reset).
    Network(String),
    /// HTTP 422 from the backend. `message` is already extracted for display.
    Validation { message: String, body: String },
    /// Any other non-2xx response.
    Api { status: u16, body: String },
    /// 2xx response whose body is not the expected JSON shape.
    Parse(String),
}

impl BackendError {
    /// HTTP status, when the failure came with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Validation { .. } => Some(422),
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Network(_) | BackendError::Parse(_) => None,
        }
    }

    /// Raw response payload, when there was one.
    pub fn body(&self) -> &str {
        match self {
            BackendError::Validation { body, .. } | BackendError::Api { body, .. } => body,
            BackendError::Network(_) | BackendError::Parse(_) => "",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BackendError::Validation { .. })
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Validation { message, .. } => write!(f, "validation error: {message}"),
            BackendError::Api { status, body } => write!(f, "API error (HTTP {status}): {body}"),
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Pulls a human-readable message out of a 422 body.
///
/// Order: `detail[0].msg`, then `detail` itself (verbatim if a string, JSON
/// text otherwise), then [`GENERIC_VALIDATION_MESSAGE`].
pub fn validation_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return GENERIC_VALIDATION_MESSAGE.to_string();
    };
    let Some(detail) = value.get("detail") else {
        return GENERIC_VALIDATION_MESSAGE.to_string();
    };

    let first_msg = detail
        .get(0)
        .and_then(|entry| entry.get("msg"))
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty());
    if let Some(msg) = first_msg {
        return msg.to_string();
    }

    match detail {
        Value::Null | Value::Bool(false) => GENERIC_VALIDATION_MESSAGE.to_string(),
        Value::String(s) if s.is_empty() => GENERIC_VALIDATION_MESSAGE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The CyRA backend as the client sees it.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Sends the full conversation and returns the reply envelope.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatEnvelope, BackendError>;

    /// Logs a report to the ledger and returns its receipt.
    async fn log_report(&self, request: &ReportRequest) -> Result<ReportReceipt, BackendError>;

    /// Fetches the ledger summary.
    async fn ledger(&self) -> Result<LedgerSummary, BackendError>;

    /// Liveness probe. Returns whatever JSON the root endpoint answered with.
    async fn probe(&self) -> Result<Value, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_prefers_first_detail_msg() {
        let body = r#"{"detail":[{"loc":["body","messages"],"msg":"ensure this value has at most 10 items","type":"value_error"}]}"#;
        assert_eq!(
            validation_message(body),
            "ensure this value has at most 10 items"
        );
    }

    #[test]
    fn validation_message_falls_back_to_raw_detail_string() {
        assert_eq!(validation_message(r#"{"detail":"bad input"}"#), "bad input");
    }

    #[test]
    fn validation_message_serializes_detail_without_msg() {
        assert_eq!(
            validation_message(r#"{"detail":[{"type":"missing"}]}"#),
            r#"[{"type":"missing"}]"#
        );
    }

    #[test]
    fn validation_message_generic_when_shape_absent() {
        assert_eq!(validation_message("not json"), GENERIC_VALIDATION_MESSAGE);
        assert_eq!(validation_message(r#"{"error":"x"}"#), GENERIC_VALIDATION_MESSAGE);
        assert_eq!(validation_message(r#"{"detail":""}"#), GENERIC_VALIDATION_MESSAGE);
    }

    #[test]
    fn error_status_and_body_accessors() {
        let err = BackendError::Api {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), "boom");
        assert!(!err.is_validation());

        let err = BackendError::Network("refused".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "network error: refused");
    }
}
