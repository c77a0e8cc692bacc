//! # StatusBar Component
//!
//! Top line: product name on the left, backend liveness on the right.
//!
//! ```text
//! ⛨ CyRA  Conversational SIEM Assistant for ISRO      ● CyRA Online  Last update: 3:04:05 PM
//! ```
//!
//! Stateless: the [`StatusSnapshot`] is a prop from the core `App`.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::status::{Reachability, StatusSnapshot};
use crate::tui::component::Component;

const TAGLINE: &str = "Conversational SIEM Assistant for ISRO";

pub struct StatusBar<'a> {
    pub status: &'a StatusSnapshot,
}

fn indicator_color(reachability: Reachability) -> Color {
    match reachability {
        Reachability::Online => Color::Green,
        Reachability::Offline => Color::Red,
        Reachability::Unknown => Color::Yellow,
    }
}

pub fn format_last_update(at: Option<&DateTime<Local>>) -> String {
    match at {
        Some(t) => t.format("%-I:%M:%S %p").to_string(),
        None => "never".to_string(),
    }
}

impl StatusBar<'_> {
    fn status_line(&self) -> Line<'static> {
        let color = indicator_color(self.status.reachability);
        Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::styled(self.status.reachability.label(), Style::default().fg(color)),
            Span::styled(
                format!(
                    "  Last update: {}",
                    format_last_update(self.status.last_update.as_ref())
                ),
                Style::default().fg(Color::Gray),
            ),
        ])
    }
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let status = self.status_line();
        let status_width = status.width() as u16;
        let [brand_area, status_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width + 1)])
                .areas(area);

        let brand = Line::from(vec![
            Span::styled(
                "⛨ CyRA",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {TAGLINE}"), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(brand), brand_area);
        frame.render_widget(Paragraph::new(status).alignment(Alignment::Right), status_area);
    }
}
