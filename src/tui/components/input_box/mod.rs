//! # InputBox Component
//!
//! Multi-line text input used for both the chat prompt and the report summary.
//!
//! ## Responsibilities
//!
//! - Capture text input and paste
//! - Editing and cursor movement across wrapped rows
//! - Emit [`InputEvent::Submit`] on Enter with non-blank content
//! - Show a placeholder when empty, and grey out while disabled
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `focused` and `disabled` are
//! props the parent refreshes every loop iteration.
//!
//! Submitting does not clear the buffer. The parent calls [`InputBox::clear`]
//! once the submission is actually accepted, so a rejected submit keeps the
//! user's text.

mod editor;
mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use editor::Editor;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed with non-blank content
    Submit(String),
    /// Buffer or cursor changed
    Changed,
}

pub struct InputBox {
    title: String,
    placeholder: String,
    editor: Editor,
    /// Visible row bounds; content beyond `max_rows` scrolls internally
    min_rows: u16,
    max_rows: u16,
    scroll_offset: u16,
    /// Inner width from the last render, used for vertical cursor movement
    last_inner_width: u16,
    /// Prop: receives keyboard input
    pub focused: bool,
    /// Prop: edits and submits are ignored
    pub disabled: bool,
}

impl InputBox {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            placeholder: placeholder.into(),
            editor: Editor::default(),
            min_rows: 1,
            max_rows: 5,
            scroll_offset: 0,
            last_inner_width: 76,
            focused: false,
            disabled: false,
        }
    }

    pub fn with_rows(mut self, min_rows: u16, max_rows: u16) -> Self {
        self.min_rows = min_rows.max(1);
        self.max_rows = max_rows.max(self.min_rows);
        self
    }

    pub fn text(&self) -> &str {
        self.editor.text()
    }

    pub fn is_blank(&self) -> bool {
        self.editor.text().trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.editor.clear();
        self.scroll_offset = 0;
    }

    fn inner_width(width: u16) -> usize {
        width.saturating_sub(HORIZONTAL_OVERHEAD).max(1) as usize
    }

    fn row_count(rows: &[std::ops::Range<usize>]) -> u16 {
        u16::try_from(rows.len()).unwrap_or(u16::MAX)
    }

    /// Height for the current buffer at `width`, borders included.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let content_rows = Self::row_count(&layout::rows(self.editor.text(), Self::inner_width(width)));
        content_rows
            .clamp(self.min_rows, self.max_rows)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    /// Keep the cursor row inside the visible window.
    fn follow_cursor(&mut self, cursor_row: u16, total_rows: u16) {
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset.saturating_add(self.max_rows) {
            self.scroll_offset = cursor_row.saturating_add(1).saturating_sub(self.max_rows);
        }
        let max_offset = total_rows.saturating_sub(self.max_rows);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    fn move_vertically(&mut self, down: bool) -> bool {
        let text = self.editor.text();
        let rows = layout::rows(text, self.last_inner_width as usize);
        let (row, col) = layout::cursor_position(text, &rows, self.editor.cursor());
        let target = if down {
            if row + 1 >= rows.len() {
                return false;
            }
            row + 1
        } else {
            let Some(up) = row.checked_sub(1) else {
                return false;
            };
            up
        };
        let pos = layout::offset_at(text, &rows, target, col);
        self.editor.set_cursor(pos);
        true
    }

    fn border_style(&self) -> Style {
        if self.disabled {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = Self::inner_width(area.width);
        self.last_inner_width = width as u16;

        let text = self.editor.text();
        let rows = layout::rows(text, width);
        let (cursor_row, cursor_col) = layout::cursor_position(text, &rows, self.editor.cursor());
        let total_rows = Self::row_count(&rows);
        let cursor_row = u16::try_from(cursor_row).unwrap_or(u16::MAX);
        let cursor_col = u16::try_from(cursor_col).unwrap_or(u16::MAX);
        self.follow_cursor(cursor_row, total_rows);

        let border_style = self.border_style();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(self.title.as_str(), border_style))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);

        let text = self.editor.text();
        let lines: Vec<Line> = if text.is_empty() {
            vec![Line::from(Span::styled(
                self.placeholder.as_str(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))]
        } else {
            let text_style = if self.disabled {
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
            } else {
                Style::default().fg(Color::White)
            };
            rows.iter()
                .skip(self.scroll_offset as usize)
                .take(inner.height as usize)
                .map(|r| Line::from(Span::styled(&text[r.clone()], text_style)))
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if total_rows > self.max_rows {
            let mut state = ScrollbarState::new(total_rows.saturating_sub(self.max_rows) as usize)
                .position(self.scroll_offset as usize);
            let track = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(VERTICAL_OVERHEAD),
            };
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                track,
                &mut state,
            );
        }

        if self.focused && !self.disabled {
            let x = inner.x.saturating_add(cursor_col);
            let y = inner
                .y
                .saturating_add(cursor_row.saturating_sub(self.scroll_offset));
            if x < inner.right() && y < inner.bottom() {
                frame.set_cursor_position((x, y));
            }
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        let changed = match event {
            TuiEvent::InputChar(c) => {
                self.editor.insert_char(*c);
                true
            }
            TuiEvent::Paste(text) => {
                self.editor.insert_str(text);
                true
            }
            TuiEvent::Backspace => self.editor.backspace(),
            TuiEvent::Delete => self.editor.delete(),
            TuiEvent::CursorLeft => self.editor.left(),
            TuiEvent::CursorRight => self.editor.right(),
            TuiEvent::CursorHome => self.editor.home(),
            TuiEvent::CursorEnd => self.editor.end(),
            TuiEvent::CursorUp => self.move_vertically(false),
            TuiEvent::CursorDown => self.move_vertically(true),
            TuiEvent::Submit => {
                return (!self.is_blank()).then(|| InputEvent::Submit(self.editor.text().to_string()));
            }
            _ => false,
        };
        changed.then_some(InputEvent::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new("Chat", "Type here...");
        input.handle_event(&TuiEvent::Paste(text.to_string()));
        input
    }

    fn screen(input: &mut InputBox, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn typing_and_backspace() {
        let mut input = InputBox::new("Chat", "");
        assert_eq!(input.handle_event(&TuiEvent::InputChar('a')), Some(InputEvent::Changed));
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.text(), "ab");
        assert_eq!(input.handle_event(&TuiEvent::Backspace), Some(InputEvent::Changed));
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn submit_keeps_buffer_until_cleared() {
        let mut input = typed("hello");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hello".into()))
        );
        assert_eq!(input.text(), "hello");
        input.clear();
        assert!(input.text().is_empty());
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut input = typed("  \n ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn disabled_box_ignores_everything() {
        let mut input = typed("draft");
        input.disabled = true;
        assert_eq!(input.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.text(), "draft");
    }

    #[test]
    fn height_grows_then_caps() {
        let input = InputBox::new("Report", "").with_rows(6, 8);
        assert_eq!(input.calculate_height(40), 6 + VERTICAL_OVERHEAD);

        let many = typed(&"line\n".repeat(20));
        assert_eq!(many.calculate_height(40), 5 + VERTICAL_OVERHEAD);
        assert_eq!(typed("one").calculate_height(40), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn vertical_movement_keeps_column() {
        let mut input = typed("abcd\nxy");
        input.handle_event(&TuiEvent::CursorUp);
        assert_eq!(input.editor.cursor(), 2);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::CursorDown);
        assert_eq!(input.editor.cursor(), 7, "clamped to the end of the shorter row");
        assert_eq!(input.handle_event(&TuiEvent::CursorDown), None);
    }

    #[test]
    fn placeholder_shows_when_empty() {
        let mut input = InputBox::new("Security Report Summary", "Enter report...");
        let text = screen(&mut input, 40, 3);
        assert!(text.contains("Security Report Summary"));
        assert!(text.contains("Enter report..."));
    }

    #[test]
    fn long_input_scrolls_to_cursor() {
        let mut input = typed(&(1..=9).map(|i| format!("row{i}")).collect::<Vec<_>>().join("\n"));
        let text = screen(&mut input, 30, 7);
        assert!(text.contains("row9"));
        assert!(!text.contains("row1 "));
        assert_eq!(input.scroll_offset, 4);
    }

    #[test]
    fn wide_characters_wrap_without_clipping() {
        // Inner width 8 holds four CJK glyphs per row
        const GLYPHS: &str = "一二三四五六七八九十";
        let mut input = typed(GLYPHS);
        let text = screen(&mut input, 12, 5);
        let visible: String = text.chars().filter(|c| GLYPHS.contains(*c)).collect();
        assert_eq!(visible, GLYPHS);
        assert_eq!(input.calculate_height(12), 3 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn cursor_sits_after_wide_characters() {
        let mut input = typed("一二");
        input.focused = true;
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        // Border + padding, then two glyphs of two cells each
        assert_eq!(
            terminal.get_cursor_position().unwrap(),
            ratatui::layout::Position::new(2 + 4, 1)
        );
    }

    #[test]
    fn huge_paste_does_not_overflow_height() {
        let input = typed(&"x\n".repeat(70_000));
        assert_eq!(input.calculate_height(40), 5 + VERTICAL_OVERHEAD);
    }
}
