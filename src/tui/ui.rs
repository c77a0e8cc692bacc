//! Screen layout.
//!
//! ```text
//! ┌ status bar ─────────────────────────────────────────────────────────┐
//! ╭ Security Analysis Console ─────────────╮╭ Immutable Report Generator ╮
//! │ messages                               ││ summary input               │
//! │                                        ││ [ submit button ]           │
//! │ chat input                             ││ receipt card                │
//! ╰────────────────────────────────────────╯╰─────────────────────────────╯
//! ```
//!
//! The chat column takes two thirds of the width. Areas that mouse clicks
//! are tested against are written back into [`TuiState::areas`] every frame.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::report_panel::BUTTON_HEIGHT;
use crate::tui::components::{MessageList, ReceiptCard, StatusBar, SubmitButton, Toasts};
use crate::tui::{Focus, TuiState};

const KEY_HINTS: &str = " Enter send · Shift+Enter newline · Tab switch panel · Ctrl+C quit ";

fn panel_block(title: &str, active: bool) -> Block<'static> {
    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Rgb(0x47, 0x55, 0x69))
    };
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(style)
        .title(Line::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::Rgb(0x67, 0xE8, 0xF9))
                .add_modifier(Modifier::BOLD),
        ))
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize, now: Instant) {
    use Constraint::{Length, Min, Percentage};

    let [status_area, body_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());
    StatusBar { status: &app.status }.render(frame, status_area);

    let [chat_area, report_area] =
        Layout::horizontal([Percentage(67), Percentage(33)]).areas(body_area);

    // Chat column
    let chat_block = panel_block("Security Analysis Console", tui.focus == Focus::Chat)
        .title_bottom(Line::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)));
    let chat_inner = chat_block.inner(chat_area);
    frame.render_widget(chat_block, chat_area);

    let input_height = tui.chat_input.calculate_height(chat_inner.width);
    let [messages_area, chat_input_area] =
        Layout::vertical([Min(0), Length(input_height)]).areas(chat_inner);

    MessageList {
        state: &mut tui.message_list,
        messages: app.conversation.messages(),
        is_loading: app.conversation.is_loading(),
        spinner_frame,
    }
    .render(frame, messages_area);
    tui.chat_input.render(frame, chat_input_area);

    // Report column
    let report_block = panel_block("Immutable Report Generator", tui.focus == Focus::Report);
    let report_inner = report_block.inner(report_area);
    frame.render_widget(report_block, report_area);

    let summary_height = tui.report_input.calculate_height(report_inner.width);
    let [summary_area, button_area, receipt_area] =
        Layout::vertical([Length(summary_height), Length(BUTTON_HEIGHT), Min(0)])
            .areas(report_inner);

    tui.report_input.render(frame, summary_area);
    SubmitButton {
        is_loading: app.report.is_loading,
        has_draft: !tui.report_input.is_blank(),
        spinner_frame,
    }
    .render(frame, button_area);
    ReceiptCard { panel: &app.report }.render(frame, receipt_area);

    Toasts {
        notifications: &app.notifications,
        now,
    }
    .render(frame, frame.area());

    tui.areas.chat_input = chat_input_area;
    tui.areas.report_input = summary_area;
    tui.areas.report_button = button_area;
}

/// Which input a click at `(col, row)` focuses, if any.
pub fn focus_at(tui: &TuiState, col: u16, row: u16) -> Option<Focus> {
    let pos = Position { x: col, y: row };
    if tui.areas.chat_input.contains(pos) {
        Some(Focus::Chat)
    } else if tui.areas.report_input.contains(pos) || tui.areas.report_button.contains(pos) {
        Some(Focus::Report)
    } else {
        None
    }
}

pub fn is_report_button(tui: &TuiState, col: u16, row: u16) -> bool {
    tui.areas
        .report_button
        .contains(Position { x: col, y: row })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LedgerSummary, ReportReceipt};
    use crate::core::message::Message;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|f| draw_ui(f, app, tui, 0, Instant::now()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn initial_screen_has_all_regions() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);
        assert!(text.contains("Security Analysis Console"));
        assert!(text.contains("Immutable Report Generator"));
        assert!(text.contains("Security Report Summary"));
        assert!(text.contains("Generate & Log Immutable Report"));
        assert!(text.contains("CyRA Connecting"));
        assert!(text.contains("CyRA Security Assistant initialized"));
    }

    #[test]
    fn click_areas_are_recorded() {
        let app = test_app();
        let mut tui = TuiState::new();
        screen(&app, &mut tui);
        let chat = tui.areas.chat_input;
        let report = tui.areas.report_input;
        let button = tui.areas.report_button;
        assert_eq!(focus_at(&tui, chat.x + 1, chat.y + 1), Some(Focus::Chat));
        assert_eq!(focus_at(&tui, report.x + 1, report.y + 1), Some(Focus::Report));
        assert!(is_report_button(&tui, button.x + 2, button.y + 1));
        assert_eq!(focus_at(&tui, 0, 0), None);
    }

    #[test]
    fn receipt_and_ledger_appear_in_report_column() {
        let mut app = test_app();
        app.report.receipt = Some(ReportReceipt {
            block_index: 4,
            hash: "f".repeat(64),
            message: "Logged".into(),
        });
        app.report.ledger = Some(LedgerSummary {
            chain_length: 5,
            total_reports: 4,
            latest_block: None,
        });
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);
        assert!(text.contains("Block Index: #4"));
        assert!(text.contains("Chain length 5 (4 reports)"));
    }

    #[test]
    fn loading_chat_shows_indicator() {
        let mut app = test_app();
        app.conversation.append(Message::user("status?"));
        app.conversation.set_loading(true);
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);
        assert!(text.contains("CyRA is analyzing"));
    }
}
