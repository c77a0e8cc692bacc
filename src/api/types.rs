use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One conversation turn as the chat endpoint accepts it: content is always a string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
}

/// Declared kind of a chat reply.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Table,
    Chart,
}

impl ResponseType {
    /// Parses the wire tag. Unknown tags yield `None` rather than an error so an
    /// unexpected reply never fails the whole envelope.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(ResponseType::Text),
            "table" => Some(ResponseType::Table),
            "chart" => Some(ResponseType::Chart),
            _ => None,
        }
    }

    pub fn is_structured(self) -> bool {
        matches!(self, ResponseType::Table | ResponseType::Chart)
    }
}

/// Response envelope of `POST /api/chat`.
///
/// Both fields are kept loose on purpose: `response_type` is an open string and
/// `response` may be a string, an object, or missing. Interpretation happens in
/// `core::message::interpret_reply`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ChatEnvelope {
    #[serde(default)]
    pub response_type: Option<String>,
    #[serde(default)]
    pub response: Value,
}

impl ChatEnvelope {
    pub fn declared_type(&self) -> Option<ResponseType> {
        self.response_type.as_deref().and_then(ResponseType::parse)
    }
}

/// Assistant reply shaped as a table or chart, discriminated by `type`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StructuredPayload {
    Table(TablePayload),
    Chart(ChartPayload),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TablePayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub headers: Vec<String>,
    /// Cells stay raw JSON: backends send strings, numbers, and the occasional null.
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ChartPayload {
    #[serde(default)]
    pub title: String,
    /// `bar`, `line`, or `pie`; anything else renders an empty chart area.
    #[serde(default)]
    pub chart_type: String,
    #[serde(default)]
    pub data: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DataPoint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

/// Body of `POST /api/log_report`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub report_summary: String,
}

/// Ledger confirmation returned after a report is logged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportReceipt {
    pub block_index: u64,
    pub hash: String,
    pub message: String,
}

impl ReportReceipt {
    /// Number of hash characters shown to the user.
    pub const HASH_PREVIEW_LEN: usize = 32;

    pub fn hash_preview(&self) -> &str {
        match self.hash.char_indices().nth(Self::HASH_PREVIEW_LEN) {
            Some((end, _)) => &self.hash[..end],
            None => &self.hash,
        }
    }
}

/// Response of `GET /api/blockchain`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LedgerSummary {
    #[serde(default)]
    pub chain_length: u64,
    #[serde(default)]
    pub total_reports: u64,
    #[serde(default)]
    pub latest_block: Option<Value>,
}
