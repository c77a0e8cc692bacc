//! Async request tasks.
//!
//! Each function runs one backend call to completion and turns the outcome
//! into the [`Action`] the event loop feeds back into `update`. There are no
//! timeouts or retries: requests run until they succeed or error.

use log::{debug, warn};

use crate::api::{Backend, ChatRequest, ReportRequest};
use crate::core::action::Action;

pub async fn chat(backend: &dyn Backend, request: &ChatRequest) -> Action {
    match backend.chat(request).await {
        Ok(envelope) => {
            debug!(
                "Chat reply received (response_type={:?})",
                envelope.response_type
            );
            Action::ChatReplied(envelope)
        }
        Err(e) => Action::ChatFailed(e),
    }
}

pub async fn report(backend: &dyn Backend, request: &ReportRequest) -> Action {
    match backend.log_report(request).await {
        Ok(receipt) => Action::ReportLogged(receipt),
        Err(e) => Action::ReportFailed(e),
    }
}

/// Ledger summary after a stored report. A failure here only reaches the log.
pub async fn ledger(backend: &dyn Backend) -> Option<Action> {
    match backend.ledger().await {
        Ok(summary) => Some(Action::LedgerLoaded(summary)),
        Err(e) => {
            warn!(
                "Ledger summary fetch failed: status={:?} body={:?} message={}",
                e.status(),
                e.body(),
                e
            );
            None
        }
    }
}
