//! # Actions
//!
//! Everything that can happen in CyRA becomes an `Action`.
//! User presses Enter in the chat box? That's `Action::SendMessage(text)`.
//! Backend answers? That's `Action::ChatReplied(envelope)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an [`Effect`] describing any I/O the adapter has to
//! start. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Every request path ends in exactly one completion action, and every
//! completion action clears its in-flight flag, so no failure leaves a panel
//! stuck in the loading state.

use std::time::Instant;

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::api::{
    BackendError, ChatEnvelope, ChatRequest, LedgerSummary, ReportReceipt, ReportRequest,
};
use crate::core::message::{Message, interpret_reply};
use crate::core::notify::Level;
use crate::core::state::App;

pub const REPORT_TIP: &str =
    "Tip: You can generate an immutable report from this analysis using the Report Generator below.";
pub const CHAT_FAILED: &str = "Failed to get response from CyRA assistant";
pub const CONNECTIVITY_APOLOGY: &str = "❌ I apologize, but I'm currently experiencing connectivity issues. Please try again in a moment.";
pub const REPORT_LOGGED: &str = "Report logged to blockchain successfully!";
pub const REPORT_FAILED: &str = "Failed to log report to blockchain";

#[derive(Debug)]
pub enum Action {
    /// Chat input submitted.
    SendMessage(String),
    ChatReplied(ChatEnvelope),
    ChatFailed(BackendError),
    /// Report input submitted.
    GenerateReport(String),
    ReportLogged(ReportReceipt),
    ReportFailed(BackendError),
    LedgerLoaded(LedgerSummary),
    /// One liveness probe finished, at wall-clock time `at`.
    StatusProbed { online: bool, at: DateTime<Local> },
    Quit,
}

/// I/O the adapter performs after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Clear the chat input and run the chat request.
    SpawnChat(ChatRequest),
    SpawnReport(ReportRequest),
    /// A receipt was stored: clear the report input and fetch the ledger summary.
    ReportStored,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    update_at(app, action, Instant::now())
}

/// [`update`] with an explicit clock for notification scheduling.
pub fn update_at(app: &mut App, action: Action, now: Instant) -> Effect {
    match action {
        Action::SendMessage(text) => {
            if text.trim().is_empty() || app.conversation.is_loading() {
                debug!("Send ignored (blank or already in flight)");
                return Effect::None;
            }

            app.pending_checkpoint = Some(app.conversation.checkpoint());
            app.conversation.append(Message::user(text));
            app.conversation.set_loading(true);

            let request = ChatRequest {
                messages: app.conversation.to_wire(),
            };
            info!("Sending chat with {} messages", request.messages.len());
            Effect::SpawnChat(request)
        }
        Action::ChatReplied(envelope) => {
            let suggest_report = envelope.declared_type().is_some_and(|t| t.is_structured());
            app.conversation.append(interpret_reply(envelope));
            if suggest_report {
                app.notifications
                    .push_delayed(Level::Info, REPORT_TIP, now, app.report_tip_delay);
            }
            finish_chat(app);
            Effect::None
        }
        Action::ChatFailed(error) => {
            warn!(
                "Chat request failed: status={:?} body={:?} message={}",
                error.status(),
                error.body(),
                error
            );
            app.notifications.push(Level::Error, CHAT_FAILED, now);

            match error {
                BackendError::Validation { message, .. } => {
                    app.notifications
                        .push(Level::Error, format!("Validation error: {message}"), now);
                    if let Some(checkpoint) = app.pending_checkpoint {
                        app.conversation.revert(checkpoint);
                    }
                }
                _ => app
                    .conversation
                    .append(Message::assistant_text(CONNECTIVITY_APOLOGY)),
            }
            finish_chat(app);
            Effect::None
        }
        Action::GenerateReport(text) => {
            if text.trim().is_empty() || app.report.is_loading {
                debug!("Report ignored (blank or already in flight)");
                return Effect::None;
            }
            app.report.is_loading = true;
            Effect::SpawnReport(ReportRequest {
                report_summary: text,
            })
        }
        Action::ReportLogged(receipt) => {
            info!(
                "Report stored at block #{} ({})",
                receipt.block_index, receipt.hash
            );
            app.report.receipt = Some(receipt);
            app.report.ledger = None;
            app.report.is_loading = false;
            app.notifications.push(Level::Success, REPORT_LOGGED, now);
            Effect::ReportStored
        }
        Action::ReportFailed(error) => {
            warn!(
                "Report request failed: status={:?} body={:?} message={}",
                error.status(),
                error.body(),
                error
            );
            app.report.is_loading = false;
            app.notifications.push(Level::Error, REPORT_FAILED, now);
            Effect::None
        }
        Action::LedgerLoaded(summary) => {
            app.report.ledger = Some(summary);
            Effect::None
        }
        Action::StatusProbed { online, at } => {
            app.status.record(online, at);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn finish_chat(app: &mut App) {
    app.conversation.set_loading(false);
    app.pending_checkpoint = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ResponseType, Role};
    use crate::core::message::MessageContent;
    use crate::core::status::Reachability;
    use crate::test_support::test_app;
    use serde_json::json;
    use std::time::Duration;

    fn texts(app: &App) -> Vec<&str> {
        app.notifications.iter().map(|n| n.text.as_str()).collect()
    }

    #[test]
    fn blank_send_is_a_no_op() {
        let mut app = test_app();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(update(&mut app, Action::SendMessage(text.into())), Effect::None);
        }
        assert_eq!(app.conversation.len(), 1);
        assert!(!app.conversation.is_loading());
    }

    #[test]
    fn send_appends_and_requests_full_history() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SendMessage("  malware?  ".into()));

        let Effect::SpawnChat(request) = effect else {
            panic!("expected SpawnChat, got {effect:?}");
        };
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::Assistant);
        assert_eq!(request.messages[1].content, "  malware?  ");
        assert!(app.conversation.is_loading());
        assert_eq!(app.conversation.len(), 2);
    }

    #[test]
    fn second_send_while_loading_is_ignored() {
        let mut app = test_app();
        update(&mut app, Action::SendMessage("one".into()));
        assert_eq!(update(&mut app, Action::SendMessage("two".into())), Effect::None);
        assert_eq!(app.conversation.len(), 2);
    }

    #[test]
    fn structured_history_is_sent_as_strings() {
        let mut app = test_app();
        update(&mut app, Action::SendMessage("table please".into()));
        update(
            &mut app,
            Action::ChatReplied(ChatEnvelope {
                response_type: Some("table".into()),
                response: json!({"type": "table", "title": "T", "headers": ["A"], "rows": [["x"]]}),
            }),
        );
        let Effect::SpawnChat(request) = update(&mut app, Action::SendMessage("more".into())) else {
            panic!("expected SpawnChat");
        };
        let table_turn: serde_json::Value =
            serde_json::from_str(&request.messages[2].content).unwrap();
        assert_eq!(table_turn["title"], "T");
    }

    #[test]
    fn text_reply_finishes_without_tip() {
        let mut app = test_app();
        update(&mut app, Action::SendMessage("hi".into()));
        update(
            &mut app,
            Action::ChatReplied(ChatEnvelope {
                response_type: Some("text".into()),
                response: json!("hello"),
            }),
        );
        assert_eq!(app.conversation.len(), 3);
        assert!(!app.conversation.is_loading());
        assert!(app.pending_checkpoint.is_none());
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn chart_reply_schedules_delayed_tip() {
        let mut app = test_app();
        let t0 = Instant::now();
        update_at(&mut app, Action::SendMessage("chart".into()), t0);
        update_at(
            &mut app,
            Action::ChatReplied(ChatEnvelope {
                response_type: Some("chart".into()),
                response: json!({"type": "chart", "chart_type": "bar", "title": "C", "data": []}),
            }),
            t0,
        );

        let last = &app.conversation.messages()[2];
        assert_eq!(last.response_type, Some(ResponseType::Chart));
        assert_eq!(app.notifications.visible(t0).count(), 0);
        let shown: Vec<_> = app
            .notifications
            .visible(t0 + Duration::from_secs(2))
            .collect();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].text, REPORT_TIP);
        assert_eq!(shown[0].level, Level::Info);
    }

    #[test]
    fn validation_failure_restores_pre_send_history() {
        let mut app = test_app();
        update(&mut app, Action::SendMessage("first".into()));
        update(
            &mut app,
            Action::ChatReplied(ChatEnvelope {
                response_type: Some("text".into()),
                response: json!("ok"),
            }),
        );
        let before = app.conversation.messages().to_vec();

        update(&mut app, Action::SendMessage("bad".into()));
        update(
            &mut app,
            Action::ChatFailed(BackendError::Validation {
                message: "field required".into(),
                body: "{}".into(),
            }),
        );

        assert_eq!(app.conversation.messages(), before.as_slice());
        assert!(!app.conversation.is_loading());
        assert_eq!(
            texts(&app),
            vec![CHAT_FAILED, "Validation error: field required"]
        );
    }

    #[test]
    fn other_failure_keeps_user_message_and_apologizes() {
        let mut app = test_app();
        let before = app.conversation.len();
        update(&mut app, Action::SendMessage("hello".into()));
        update(
            &mut app,
            Action::ChatFailed(BackendError::Api {
                status: 500,
                body: "boom".into(),
            }),
        );

        assert_eq!(app.conversation.len(), before + 2);
        let last = app.conversation.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, MessageContent::Text(CONNECTIVITY_APOLOGY.into()));
        assert!(!app.conversation.is_loading());
        assert_eq!(texts(&app), vec![CHAT_FAILED]);
    }

    #[test]
    fn network_failure_also_clears_loading() {
        let mut app = test_app();
        update(&mut app, Action::SendMessage("hello".into()));
        update(&mut app, Action::ChatFailed(BackendError::Network("refused".into())));
        assert!(!app.conversation.is_loading());
        assert!(matches!(
            update(&mut app, Action::SendMessage("again".into())),
            Effect::SpawnChat(_)
        ));
    }

    #[test]
    fn report_success_replaces_receipt() {
        let mut app = test_app();
        let effect = update(&mut app, Action::GenerateReport("Incident 42".into()));
        assert_eq!(
            effect,
            Effect::SpawnReport(ReportRequest {
                report_summary: "Incident 42".into()
            })
        );
        assert!(app.report.is_loading);

        let receipt = ReportReceipt {
            block_index: 7,
            hash: "ab".repeat(32),
            message: "Report logged successfully".into(),
        };
        assert_eq!(
            update(&mut app, Action::ReportLogged(receipt.clone())),
            Effect::ReportStored
        );
        assert_eq!(app.report.receipt, Some(receipt));
        assert!(!app.report.is_loading);
        assert_eq!(texts(&app), vec![REPORT_LOGGED]);
    }

    #[test]
    fn report_failure_keeps_prior_receipt() {
        let mut app = test_app();
        let receipt = ReportReceipt {
            block_index: 1,
            hash: "h".into(),
            message: "m".into(),
        };
        app.report.receipt = Some(receipt.clone());

        update(&mut app, Action::GenerateReport("x".into()));
        update(&mut app, Action::ReportFailed(BackendError::Network("down".into())));

        assert_eq!(app.report.receipt, Some(receipt));
        assert!(!app.report.is_loading);
        assert_eq!(texts(&app), vec![REPORT_FAILED]);
    }

    #[test]
    fn report_guards_blank_and_reentry() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::GenerateReport("  ".into())), Effect::None);
        update(&mut app, Action::GenerateReport("a".into()));
        assert_eq!(update(&mut app, Action::GenerateReport("b".into())), Effect::None);
    }

    #[test]
    fn chat_and_report_are_independent() {
        let mut app = test_app();
        update(&mut app, Action::SendMessage("q".into()));
        assert!(matches!(
            update(&mut app, Action::GenerateReport("r".into())),
            Effect::SpawnReport(_)
        ));
    }

    #[test]
    fn ledger_and_status_are_recorded() {
        let mut app = test_app();
        update(
            &mut app,
            Action::LedgerLoaded(LedgerSummary {
                chain_length: 3,
                total_reports: 2,
                latest_block: None,
            }),
        );
        assert_eq!(app.report.ledger.as_ref().map(|l| l.chain_length), Some(3));

        let at = Local::now();
        update(&mut app, Action::StatusProbed { online: true, at });
        assert_eq!(app.status.reachability, Reachability::Online);
        assert_eq!(app.status.last_update, Some(at));
    }

    #[test]
    fn quit_maps_to_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
