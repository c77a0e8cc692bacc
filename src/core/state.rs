//! # Application State
//!
//! Core business state for CyRA. Domain logic only; presentation state
//! (focus, input buffers, scroll positions) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn Backend>       // HTTP collaborator
//! ├── conversation: Conversation      // chat history + chat in-flight flag
//! ├── pending_checkpoint: Option      // pre-send marker for the 422 rollback
//! ├── report: ReportPanel             // receipt, ledger summary, in-flight flag
//! ├── status: StatusSnapshot          // online/offline + last probe time
//! ├── notifications: Notifications    // transient toasts
//! └── report_tip_delay: Duration      // delay before the report suggestion
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{Backend, LedgerSummary, ReportReceipt};
use crate::core::config::{DEFAULT_NOTIFICATION_TTL_MS, DEFAULT_REPORT_TIP_DELAY_MS, ResolvedConfig};
use crate::core::conversation::{Checkpoint, Conversation};
use crate::core::notify::Notifications;
use crate::core::status::StatusSnapshot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPanel {
    /// Latest receipt; replaced on every successful submission.
    pub receipt: Option<ReportReceipt>,
    /// Chain summary fetched after the latest receipt.
    pub ledger: Option<LedgerSummary>,
    pub is_loading: bool,
}

pub struct App {
    pub backend: Arc<dyn Backend>,
    pub conversation: Conversation,
    pub pending_checkpoint: Option<Checkpoint>,
    pub report: ReportPanel,
    pub status: StatusSnapshot,
    pub notifications: Notifications,
    pub report_tip_delay: Duration,
}

impl App {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            conversation: Conversation::new(),
            pending_checkpoint: None,
            report: ReportPanel::default(),
            status: StatusSnapshot::default(),
            notifications: Notifications::new(Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS)),
            report_tip_delay: Duration::from_millis(DEFAULT_REPORT_TIP_DELAY_MS),
        }
    }

    pub fn from_config(backend: Arc<dyn Backend>, config: &ResolvedConfig) -> Self {
        Self {
            notifications: Notifications::new(config.notification_ttl),
            report_tip_delay: config.report_tip_delay,
            ..Self::new(backend)
        }
    }
}
