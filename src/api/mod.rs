//! # Backend Wire Contract
//!
//! Everything the client knows about the CyRA backend: the JSON shapes that
//! cross the wire (`types`), the `Backend` trait the rest of the crate talks
//! to (`backend`), and its reqwest implementation (`http`).
//!
//! ```text
//! POST {root}/api/chat        {messages}        → {response_type, response}
//! POST {root}/api/log_report  {report_summary}  → {block_index, hash, message}
//! GET  {root}/api/blockchain                    → {chain_length, total_reports, latest_block}
//! GET  {root}/api/                              → any truthy JSON
//! ```

pub mod backend;
pub mod http;
pub mod types;

pub use backend::{Backend, BackendError};
pub use http::HttpBackend;
pub use types::{
    ChartPayload, ChatEnvelope, ChatRequest, DataPoint, LedgerSummary, ReportReceipt,
    ReportRequest, ResponseType, Role, StructuredPayload, TablePayload, WireMessage,
};
