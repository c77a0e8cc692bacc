//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{
    Backend, BackendError, ChatEnvelope, ChatRequest, LedgerSummary, ReportReceipt, ReportRequest,
};

type Script<T> = Mutex<VecDeque<Result<T, BackendError>>>;

/// A backend that answers from per-endpoint queues.
///
/// An empty queue answers with a network error, so a test only scripts the
/// calls it cares about.
#[derive(Default)]
pub struct ScriptedBackend {
    chat: Script<ChatEnvelope>,
    report: Script<ReportReceipt>,
    ledger: Script<LedgerSummary>,
    probe: Script<Value>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    probe_calls: Mutex<usize>,
}

fn next<T>(script: &Script<T>, endpoint: &str) -> Result<T, BackendError> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(BackendError::Network(format!("{endpoint}: nothing scripted"))))
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chat(&self, result: Result<ChatEnvelope, BackendError>) {
        self.chat.lock().unwrap().push_back(result);
    }

    pub fn push_report(&self, result: Result<ReportReceipt, BackendError>) {
        self.report.lock().unwrap().push_back(result);
    }

    pub fn push_ledger(&self, result: Result<LedgerSummary, BackendError>) {
        self.ledger.lock().unwrap().push_back(result);
    }

    pub fn push_probe(&self, result: Result<Value, BackendError>) {
        self.probe.lock().unwrap().push_back(result);
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn probe_calls(&self) -> usize {
        *self.probe_calls.lock().unwrap()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatEnvelope, BackendError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        next(&self.chat, "chat")
    }

    async fn log_report(&self, _request: &ReportRequest) -> Result<ReportReceipt, BackendError> {
        next(&self.report, "log_report")
    }

    async fn ledger(&self) -> Result<LedgerSummary, BackendError> {
        next(&self.ledger, "blockchain")
    }

    async fn probe(&self) -> Result<Value, BackendError> {
        *self.probe_calls.lock().unwrap() += 1;
        next(&self.probe, "probe")
    }
}

/// Creates a test App backed by an empty [`ScriptedBackend`].
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(ScriptedBackend::new()))
}
