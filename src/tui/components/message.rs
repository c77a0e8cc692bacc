use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
    StatefulWidget, Table, Widget,
};

use crate::core::render::{Cell, ChartView, MessageView, Severity, TableView, TextView};
use crate::tui::components::chart::{CHART_HEIGHT, ChartPlot};
use crate::tui::highlight::{block_lines, prose_lines, wrap_text};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Visible rows of a scroll-bounded text message.
pub const BOUNDED_ROWS: u16 = 16;

const USER_COLOR: Color = Color::Blue;
const ASSISTANT_COLOR: Color = Color::Cyan;
const HEADING_COLOR: Color = Color::Rgb(0x93, 0xC5, 0xFD);

/// Row count as a terminal height, saturating at `u16::MAX`.
pub(crate) fn rows_u16(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

/// Measured size of one message at a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics {
    pub height: u16,
    /// Rows hidden below a bounded text container; zero otherwise.
    pub overflow: u16,
    /// Whether a click toggles a collapsible section.
    pub collapsible: bool,
}

/// One chat message, drawn from its [`MessageView`].
///
/// Transient: built each frame. Hover, expansion and inner scroll position
/// are owned by `MessageListState` and passed in.
pub struct Message<'a> {
    pub view: &'a MessageView,
    pub is_hovered: bool,
    /// Table analysis is shown
    pub is_expanded: bool,
    /// First visible row inside a bounded text container
    pub inner_offset: u16,
}

fn content_width(width: u16) -> usize {
    width.saturating_sub(HORIZONTAL_OVERHEAD) as usize
}

fn prose_style() -> Style {
    Style::default().fg(Color::White)
}

fn analysis_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Text messages reserve one column for their scrollbar when bounded.
fn text_lines(view: &TextView, width: usize) -> Vec<Line<'static>> {
    let width = if view.scroll_bounded {
        width.saturating_sub(1)
    } else {
        width
    };
    block_lines(&view.blocks, width, prose_style())
}

fn toggle_line(expanded: bool) -> Line<'static> {
    let marker = if expanded { "▾ " } else { "▸ " };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(
            "AI Analysis",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn title_line(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(HEADING_COLOR)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Lines above a table: toggle, then analysis when expanded.
fn table_preamble(view: &TableView, width: usize, expanded: bool) -> Vec<Line<'static>> {
    let Some(analysis) = &view.analysis else {
        return Vec::new();
    };
    let mut lines = vec![toggle_line(expanded)];
    if expanded {
        lines.extend(prose_lines(analysis, width, analysis_style()));
        lines.push(Line::default());
    }
    lines
}

/// Analysis paragraph above a chart; never collapsed.
fn chart_preamble(view: &ChartView, width: usize) -> Vec<Line<'static>> {
    let Some(analysis) = &view.analysis else {
        return Vec::new();
    };
    let mut lines = prose_lines(analysis, width, analysis_style());
    lines.push(Line::default());
    lines
}

fn badge_style(severity: Severity) -> Style {
    let bg = match severity {
        Severity::Critical => Color::Rgb(0xDC, 0x26, 0x26),
        Severity::High => Color::Rgb(0xEA, 0x58, 0x0C),
        Severity::Standard => Color::Rgb(0x47, 0x55, 0x69),
    };
    Style::default()
        .fg(Color::White)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

fn table_cell(cell: &Cell) -> ratatui::widgets::Cell<'static> {
    match cell {
        Cell::Plain(text) => ratatui::widgets::Cell::from(text.clone()),
        Cell::Badge { label, severity } => ratatui::widgets::Cell::from(Line::from(Span::styled(
            format!(" {label} "),
            badge_style(*severity),
        ))),
    }
}

impl Message<'_> {
    /// Height and inner overflow of `view` at `width`, without drawing it.
    ///
    /// Uses the same line builders as rendering, so the measurement is exact.
    pub fn measure(view: &MessageView, width: u16, is_expanded: bool) -> Metrics {
        let inner = content_width(width);
        if inner == 0 {
            // Terminal too narrow for borders + padding
            return Metrics {
                height: 1,
                ..Metrics::default()
            };
        }

        let (content, overflow, collapsible) = match view {
            MessageView::UserText(text) => (rows_u16(wrap_text(text, inner).len()).max(1), 0, false),
            MessageView::Text(text) => {
                let total = rows_u16(text_lines(text, inner).len()).max(1);
                if text.scroll_bounded && total > BOUNDED_ROWS {
                    (BOUNDED_ROWS, total - BOUNDED_ROWS, false)
                } else {
                    (total, 0, false)
                }
            }
            MessageView::Table(table) => {
                let preamble = rows_u16(table_preamble(table, inner, is_expanded).len());
                // title + header + rows
                let body = rows_u16(table.rows.len()).saturating_add(2);
                (preamble.saturating_add(body), 0, table.analysis.is_some())
            }
            MessageView::Chart(chart) => {
                let preamble = rows_u16(chart_preamble(chart, inner).len());
                (preamble.saturating_add(1 + CHART_HEIGHT), 0, false)
            }
        };

        Metrics {
            height: content.saturating_add(VERTICAL_OVERHEAD),
            overflow,
            collapsible,
        }
    }

    fn role(&self) -> (&'static str, Color) {
        match self.view {
            MessageView::UserText(_) => ("you", USER_COLOR),
            _ => ("cyra", ASSISTANT_COLOR),
        }
    }

    fn render_text(&self, view: &TextView, area: Rect, buf: &mut Buffer) {
        let lines = text_lines(view, area.width as usize);
        let total = rows_u16(lines.len());
        if !view.scroll_bounded || total <= BOUNDED_ROWS {
            Paragraph::new(lines).render(area, buf);
            return;
        }

        let overflow = total - BOUNDED_ROWS;
        let offset = self.inner_offset.min(overflow);
        let [text_area, bar_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        Paragraph::new(lines)
            .scroll((offset, 0))
            .render(text_area, buf);

        let mut state = ScrollbarState::new(overflow as usize).position(offset as usize);
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .render(bar_area, buf, &mut state);
    }

    fn render_table(&self, view: &TableView, area: Rect, buf: &mut Buffer) {
        let mut lines = table_preamble(view, area.width as usize, self.is_expanded);
        lines.push(title_line(&view.title));
        let preamble_height = rows_u16(lines.len());
        let [head_area, table_area] =
            Layout::vertical([Constraint::Length(preamble_height), Constraint::Min(0)]).areas(area);
        Paragraph::new(lines).render(head_area, buf);

        let columns = view.headers.len().max(1);
        let header = Row::new(view.headers.iter().cloned()).style(
            Style::default()
                .fg(HEADING_COLOR)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
        let rows = view
            .rows
            .iter()
            .map(|row| Row::new(row.iter().map(table_cell)));
        let table = Table::new(rows, vec![Constraint::Fill(1); columns])
            .header(header)
            .column_spacing(1)
            .style(prose_style());
        Widget::render(table, table_area, buf);
    }

    fn render_chart(&self, view: &ChartView, area: Rect, buf: &mut Buffer) {
        let mut lines = chart_preamble(view, area.width as usize);
        lines.push(title_line(&view.title));
        let head_height = rows_u16(lines.len());
        let [head_area, plot_area] =
            Layout::vertical([Constraint::Length(head_height), Constraint::Length(CHART_HEIGHT)])
                .areas(area);
        Paragraph::new(lines).render(head_area, buf);
        ChartPlot { view }.render(plot_area, buf);
    }
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (role, color) = self.role();
        let border_style = if self.is_hovered {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(role)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(area);
        block.render(area, buf);

        match self.view {
            MessageView::UserText(text) => {
                Paragraph::new(prose_lines(text, inner.width as usize, prose_style()))
                    .render(inner, buf);
            }
            MessageView::Text(view) => self.render_text(view, inner, buf),
            MessageView::Table(view) => self.render_table(view, inner, buf),
            MessageView::Chart(view) => self.render_chart(view, inner, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DataPoint;
    use crate::core::fence::TextBlock;
    use crate::core::render::ChartForm;

    fn text(body: &str, scroll_bounded: bool) -> MessageView {
        MessageView::Text(TextView {
            blocks: vec![TextBlock::Prose(body.into())],
            scroll_bounded,
        })
    }

    fn table(analysis: Option<&str>, rows: usize) -> MessageView {
        MessageView::Table(TableView {
            title: "Active Threats".into(),
            analysis: analysis.map(str::to_string),
            headers: vec!["Threat".into(), "Risk".into()],
            rows: (0..rows)
                .map(|i| {
                    vec![
                        Cell::Plain(format!("t{i}")),
                        Cell::Badge {
                            label: "Critical".into(),
                            severity: Severity::Critical,
                        },
                    ]
                })
                .collect(),
        })
    }

    fn draw(view: &MessageView, width: u16, expanded: bool, offset: u16) -> (Buffer, Metrics) {
        let metrics = Message::measure(view, width, expanded);
        let area = Rect::new(0, 0, width, metrics.height);
        let mut buf = Buffer::empty(area);
        Message {
            view,
            is_hovered: false,
            is_expanded: expanded,
            inner_offset: offset,
        }
        .render(area, &mut buf);
        (buf, metrics)
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn zero_width_returns_minimum() {
        assert_eq!(Message::measure(&text("Hello", false), 0, false).height, 1);
        assert_eq!(Message::measure(&text("Hello", false), HORIZONTAL_OVERHEAD, false).height, 1);
    }

    #[test]
    fn single_line_fits() {
        assert_eq!(
            Message::measure(&text("Hello", false), 80, false).height,
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn wraps_at_width_boundary() {
        // content width 5 → "Hello" | "world"
        let view = MessageView::UserText("Hello world".into());
        assert_eq!(Message::measure(&view, 9, false).height, 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn bounded_text_caps_height_and_reports_overflow() {
        let body = vec!["row"; 40].join("\n");
        let metrics = Message::measure(&text(&body, true), 40, false);
        assert_eq!(metrics.height, BOUNDED_ROWS + VERTICAL_OVERHEAD);
        assert_eq!(metrics.overflow, 40 - BOUNDED_ROWS);

        let unbounded = Message::measure(&text(&body, false), 40, false);
        assert_eq!(unbounded.height, 40 + VERTICAL_OVERHEAD);
        assert_eq!(unbounded.overflow, 0);
    }

    #[test]
    fn bounded_text_scrolls_by_inner_offset() {
        let body = (0..30).map(|i| format!("line{i:02}")).collect::<Vec<_>>().join("\n");
        let view = text(&body, true);
        let (top, _) = draw(&view, 30, false, 0);
        assert!(row_text(&top, 1).contains("line00"));
        let (scrolled, _) = draw(&view, 30, false, 5);
        assert!(row_text(&scrolled, 1).contains("line05"));
        // Offsets past the end clamp
        let (clamped, metrics) = draw(&view, 30, false, 99);
        assert!(row_text(&clamped, 1).contains(&format!("line{:02}", metrics.overflow)));
    }

    #[test]
    fn table_analysis_is_collapsed_by_default() {
        let view = table(Some("Escalate now."), 2);
        let collapsed = Message::measure(&view, 60, false);
        let expanded = Message::measure(&view, 60, true);
        // toggle + title + header + 2 rows
        assert_eq!(collapsed.height, 1 + 1 + 1 + 2 + VERTICAL_OVERHEAD);
        // + analysis line + spacer
        assert_eq!(expanded.height, collapsed.height + 2);
        assert!(collapsed.collapsible);

        let (buf, _) = draw(&view, 60, false, 0);
        assert!(row_text(&buf, 1).contains("▸ AI Analysis"));
        let (buf, _) = draw(&view, 60, true, 0);
        assert!(row_text(&buf, 1).contains("▾ AI Analysis"));
        assert!(row_text(&buf, 2).contains("Escalate now."));
    }

    #[test]
    fn table_without_analysis_is_not_collapsible() {
        let metrics = Message::measure(&table(None, 3), 60, false);
        assert_eq!(metrics.height, 1 + 1 + 3 + VERTICAL_OVERHEAD);
        assert!(!metrics.collapsible);
    }

    #[test]
    fn badge_cells_render_label_with_background() {
        let view = table(None, 1);
        let (buf, _) = draw(&view, 60, false, 0);
        // title at row 1, header at row 2, first row at row 3
        let row = row_text(&buf, 3);
        assert!(row.contains("t0"));
        assert!(row.contains("Critical"));
        let x = row.find("Critical").map(|i| row[..i].chars().count()).unwrap() as u16;
        assert_eq!(buf[(x, 3)].bg, Color::Rgb(0xDC, 0x26, 0x26));
    }

    #[test]
    fn chart_analysis_is_always_shown() {
        let view = MessageView::Chart(ChartView {
            title: "Failed Logins".into(),
            analysis: Some("Spike at 03:00.".into()),
            form: ChartForm::Bar,
            points: vec![DataPoint {
                name: "Mon".into(),
                value: 3.0,
            }],
        });
        let metrics = Message::measure(&view, 60, false);
        assert_eq!(metrics.height, 2 + 1 + CHART_HEIGHT + VERTICAL_OVERHEAD);
        let (buf, _) = draw(&view, 60, false, 0);
        assert!(row_text(&buf, 1).contains("Spike at 03:00."));
        assert!(row_text(&buf, 3).contains("Failed Logins"));
    }

    #[test]
    fn role_titles() {
        let (buf, _) = draw(&MessageView::UserText("hi".into()), 20, false, 0);
        assert!(row_text(&buf, 0).contains("you"));
        let (buf, _) = draw(&text("hi", false), 20, false, 0);
        assert!(row_text(&buf, 0).contains("cyra"));
    }

    #[test]
    fn oversized_content_saturates_height() {
        let long = MessageView::UserText("a\n".repeat(65_534));
        assert_eq!(Message::measure(&long, 60, false).height, u16::MAX);

        let metrics = Message::measure(&table(None, 70_000), 60, false);
        assert_eq!(metrics.height, u16::MAX);
    }
}
