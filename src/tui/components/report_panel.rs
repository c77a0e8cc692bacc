//! # Report Panel Pieces
//!
//! The submit button and the receipt card of the "Immutable Report Generator"
//! column. The summary input itself is an [`InputBox`](super::InputBox)
//! laid out by `ui.rs` between the label and the button.
//!
//! ```text
//! ╭ Generate & Log Immutable Report ╮      ✔ Report Logged Successfully
//! ╰─────────────────────────────────╯      Block Index: #12
//!                                          Hash: 3fa9…(32 chars)...
//!                                          Report stored in block 12
//!                                          Chain length 13 (12 reports)
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::api::{LedgerSummary, ReportReceipt};
use crate::core::state::ReportPanel;
use crate::tui::component::Component;

pub const BUTTON_LABEL: &str = "Generate & Log Immutable Report";
pub const BUTTON_BUSY_LABEL: &str = "Generating & Logging...";
pub const BUTTON_HEIGHT: u16 = 3;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

const LABEL_COLOR: Color = Color::Rgb(0x67, 0xE8, 0xF9);

/// The submit button. Enabled only with a non-blank draft and nothing in flight.
pub struct SubmitButton {
    pub is_loading: bool,
    pub has_draft: bool,
    pub spinner_frame: usize,
}

impl SubmitButton {
    pub fn is_enabled(&self) -> bool {
        self.has_draft && !self.is_loading
    }

    fn label(&self) -> Line<'static> {
        if self.is_loading {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            Line::from(format!("{spinner} {BUTTON_BUSY_LABEL}"))
        } else {
            Line::from(format!("⛨ {BUTTON_LABEL}"))
        }
    }
}

impl Component for SubmitButton {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = if self.is_enabled() {
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0x08, 0x91, 0xB2))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let button = Paragraph::new(self.label())
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(style),
            );
        frame.render_widget(button, area);
    }
}

pub fn ledger_line(ledger: &LedgerSummary) -> String {
    format!(
        "Chain length {} ({} reports)",
        ledger.chain_length, ledger.total_reports
    )
}

fn receipt_lines(receipt: &ReportReceipt) -> Vec<Line<'static>> {
    let label = Style::default()
        .fg(LABEL_COLOR)
        .add_modifier(Modifier::BOLD);
    vec![
        Line::from(Span::styled(
            "✔ Report Logged Successfully",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Block Index:", label),
            Span::raw(format!(" #{}", receipt.block_index)),
        ]),
        Line::from(vec![
            Span::styled("Hash:", label),
            Span::styled(
                format!(" {}...", receipt.hash_preview()),
                Style::default().fg(Color::Gray).bg(Color::Rgb(0x33, 0x41, 0x55)),
            ),
        ]),
        Line::default(),
        Line::from(Span::styled(
            receipt.message.clone(),
            Style::default().fg(Color::Gray),
        )),
    ]
}

/// Latest receipt plus ledger summary; empty until the first success.
pub struct ReceiptCard<'a> {
    pub panel: &'a ReportPanel,
}

impl Component for ReceiptCard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(receipt) = &self.panel.receipt else {
            return;
        };
        let mut lines = receipt_lines(receipt);
        if let Some(ledger) = &self.panel.ledger {
            lines.push(Line::from(Span::styled(
                ledger_line(ledger),
                Style::default().fg(Color::DarkGray),
            )));
        }
        let card = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(card, area);
    }
}
