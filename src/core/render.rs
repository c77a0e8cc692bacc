//! # Message Renderer
//!
//! Pure mapping from one [`Message`] to a [`MessageView`], the presentation
//! decision the TUI draws. First matching rule wins:
//!
//! 1. user message → verbatim text
//! 2. table payload → optional analysis + table with a severity badge column
//! 3. chart payload → optional analysis + bar/line/pie chart
//! 4. text with fences → prose/code breakdown
//! 5. text over [`LONG_TEXT_THRESHOLD`] chars → height-bounded container
//! 6. anything else → plain paragraph
//!
//! Rules 4 and 5 compose: fenced text that is also long gets the breakdown
//! inside the bounded container.
//!
//! No caching happens here. Calling [`render`] twice on the same message
//! yields equal views.

use serde_json::Value;

use crate::api::{ChartPayload, DataPoint, Role, StructuredPayload, TablePayload};
use crate::core::fence::{self, TextBlock};
use crate::core::message::{Message, MessageContent, stringify};

/// Character count above which text is scroll-bounded.
pub const LONG_TEXT_THRESHOLD: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Pie sector colors, assigned by position modulo length.
pub const PIE_PALETTE: [Rgb; 6] = [
    Rgb(0x3B, 0x82, 0xF6),
    Rgb(0x06, 0xB6, 0xD4),
    Rgb(0x10, 0xB9, 0x81),
    Rgb(0xF5, 0x9E, 0x0B),
    Rgb(0xEF, 0x44, 0x44),
    Rgb(0x8B, 0x5C, 0xF6),
];

#[derive(Debug, Clone, PartialEq)]
pub enum MessageView {
    /// User input, shown exactly as typed.
    UserText(String),
    Text(TextView),
    Table(TableView),
    Chart(ChartView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    pub blocks: Vec<TextBlock>,
    pub scroll_bounded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Standard,
}

impl Severity {
    /// Exact, case-sensitive match on the label.
    pub fn classify(label: &str) -> Self {
        match label {
            "Critical" => Severity::Critical,
            "High" => Severity::High,
            _ => Severity::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Plain(String),
    Badge { label: String, severity: Severity },
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Cell::Plain(text) | Cell::Badge { label: text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub title: String,
    /// Collapsible analysis; `None` when absent or empty.
    pub analysis: Option<String>,
    pub headers: Vec<String>,
    /// Every row has exactly `headers.len()` cells; the last one is a badge.
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    /// Fraction of the total in `0.0..=1.0`; zero when the total is not positive.
    pub share: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartForm {
    Bar,
    Line,
    Pie(Vec<PieSlice>),
    /// Unknown `chart_type`: the chart area stays empty.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub title: String,
    pub analysis: Option<String>,
    pub form: ChartForm,
    pub points: Vec<DataPoint>,
}

pub fn render(message: &Message) -> MessageView {
    match (message.role, &message.content) {
        (Role::User, content) => MessageView::UserText(content.to_wire_string()),
        (_, MessageContent::Structured(StructuredPayload::Table(table))) => {
            MessageView::Table(table_view(table))
        }
        (_, MessageContent::Structured(StructuredPayload::Chart(chart))) => {
            MessageView::Chart(chart_view(chart))
        }
        (_, MessageContent::Text(text)) => MessageView::Text(text_view(text)),
    }
}

fn text_view(text: &str) -> TextView {
    let blocks = if fence::has_fence(text) {
        fence::split(text)
    } else {
        vec![TextBlock::Prose(text.to_string())]
    };
    TextView {
        blocks,
        scroll_bounded: text.chars().count() > LONG_TEXT_THRESHOLD,
    }
}

fn non_empty(analysis: &Option<String>) -> Option<String> {
    analysis.as_ref().filter(|a| !a.is_empty()).cloned()
}

fn table_view(table: &TablePayload) -> TableView {
    let columns = table.headers.len();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            (0..columns)
                .map(|col| {
                    let text = row.get(col).map(stringify).unwrap_or_default();
                    if col + 1 == columns {
                        let severity = match row.get(col) {
                            Some(Value::String(label)) => Severity::classify(label),
                            _ => Severity::Standard,
                        };
                        Cell::Badge {
                            label: text,
                            severity,
                        }
                    } else {
                        Cell::Plain(text)
                    }
                })
                .collect()
        })
        .collect();

    TableView {
        title: table.title.clone(),
        analysis: non_empty(&table.ai_analysis),
        headers: table.headers.clone(),
        rows,
    }
}

fn chart_view(chart: &ChartPayload) -> ChartView {
    let form = match chart.chart_type.as_str() {
        "bar" => ChartForm::Bar,
        "line" => ChartForm::Line,
        "pie" => ChartForm::Pie(pie_slices(&chart.data)),
        other => ChartForm::Unsupported(other.to_string()),
    };
    ChartView {
        title: chart.title.clone(),
        analysis: non_empty(&chart.ai_analysis),
        form,
        points: chart.data.clone(),
    }
}

fn pie_slices(points: &[DataPoint]) -> Vec<PieSlice> {
    let total: f64 = points.iter().map(|p| p.value.max(0.0)).sum();
    points
        .iter()
        .enumerate()
        .map(|(i, p)| PieSlice {
            name: p.name.clone(),
            value: p.value,
            share: if total > 0.0 {
                p.value.max(0.0) / total
            } else {
                0.0
            },
            color: PIE_PALETTE[i % PIE_PALETTE.len()],
        })
        .collect()
}
