//! # Toasts
//!
//! Stacked notifications in the top-right corner, drawn over everything else.
//! Only notifications currently visible (per their delay and time-to-live)
//! are drawn, newest at the bottom.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::core::notify::{Level, Notifications};
use crate::tui::component::Component;
use crate::tui::highlight::wrap_text;

const MAX_WIDTH: u16 = 44;
/// Borders + one column of padding each side
const HORIZONTAL_OVERHEAD: u16 = 4;

pub struct Toasts<'a> {
    pub notifications: &'a Notifications,
    pub now: Instant,
}

fn accent(level: Level) -> (Color, &'static str) {
    match level {
        Level::Info => (Color::Cyan, "ℹ"),
        Level::Success => (Color::Green, "✔"),
        Level::Error => (Color::Red, "✖"),
    }
}

impl Component for Toasts<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = MAX_WIDTH.min(area.width);
        if width <= HORIZONTAL_OVERHEAD {
            return;
        }
        let text_width = (width - HORIZONTAL_OVERHEAD) as usize;
        let x = area.right() - width;
        let mut y = area.y + 1;

        for note in self.notifications.visible(self.now) {
            let (color, icon) = accent(note.level);
            let prefix = format!("{icon} ");
            let lines: Vec<Line> = wrap_text(&format!("{prefix}{}", note.text), text_width)
                .into_iter()
                .map(|row| match row.strip_prefix(&prefix) {
                    Some(rest) => Line::from(vec![
                        Span::styled(prefix.clone(), Style::default().fg(color)),
                        Span::styled(rest.to_string(), Style::default().fg(Color::White)),
                    ]),
                    None => Line::from(Span::styled(row, Style::default().fg(Color::White))),
                })
                .collect();
            let height = lines.len() as u16 + 2;
            if y + height > area.bottom() {
                break;
            }
            let rect = Rect::new(x, y, width, height);
            let body = Paragraph::new(lines)
                .style(Style::default().bg(Color::Rgb(0x1E, 0x29, 0x3B)))
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(color))
                        .padding(Padding::horizontal(1)),
                );
            frame.render_widget(Clear, rect);
            frame.render_widget(body, rect);
            y += height;
        }
    }
}
