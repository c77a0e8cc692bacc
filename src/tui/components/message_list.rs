//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display every message through [`Message`]
//! - Keep the view pinned to the newest message until the user scrolls away
//! - Hit testing for hover, clicks and wheel events
//! - Scroll inside height-bounded text messages before scrolling the list
//! - Show the "analyzing" indicator while a chat request is in flight
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the messages (props).
//! Measurements live in a [`LayoutCache`]: messages never change after they
//! are appended, so a cached entry stays valid until the width changes, the
//! conversation shrinks, or a table is expanded or collapsed.

use std::collections::{HashMap, HashSet};

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message as ChatMessage;
use crate::core::render;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, Metrics};
use crate::tui::event::TuiEvent;

/// Blank row + indicator row appended while loading.
const INDICATOR_ROWS: u16 = 2;
/// Rows moved per wheel notch inside a bounded message.
const INNER_SCROLL_STEP: u16 = 3;

pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    pub hovered_index: Option<usize>,
    /// Tables whose analysis is expanded
    pub expanded_indices: HashSet<usize>,
    /// Scroll position inside bounded text messages
    pub inner_offsets: HashMap<usize, u16>,
    /// Screen area from the last render, for hit testing
    pub area: Rect,
    /// Content height from the last render, loading indicator included
    canvas_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            hovered_index: None,
            expanded_indices: HashSet::new(),
            inner_offsets: HashMap::new(),
            area: Rect::default(),
            canvas_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.canvas_height.saturating_sub(self.area.height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y > max_y {
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    /// Re-engage auto-scroll once the user is back at the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    fn scroll_up(&mut self) {
        self.scroll_state.scroll_up();
        self.stick_to_bottom = false;
    }

    fn scroll_down(&mut self) {
        self.scroll_state.scroll_down();
        self.repin_if_at_bottom();
    }

    /// Message index under a screen position, if any.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<usize> {
        if !self.area.contains(Position { x: col, y: row }) {
            return None;
        }
        // Last column is the scrollbar
        if col + 1 >= self.area.right() {
            return None;
        }
        let content_y = (row - self.area.y).saturating_add(self.scroll_state.offset().y);
        self.layout.index_at(content_y)
    }

    /// Scroll a bounded message under the pointer; false when it is already
    /// at that edge (or there is none) and the list should scroll instead.
    fn scroll_inner(&mut self, idx: usize, down: bool) -> bool {
        let overflow = self.layout.metrics(idx).map_or(0, |m| m.overflow);
        if overflow == 0 {
            return false;
        }
        let current = self.inner_offsets.get(&idx).copied().unwrap_or(0).min(overflow);
        let next = if down {
            current.saturating_add(INNER_SCROLL_STEP).min(overflow)
        } else {
            current.saturating_sub(INNER_SCROLL_STEP)
        };
        if next == current {
            return false;
        }
        self.inner_offsets.insert(idx, next);
        true
    }

    fn toggle(&mut self, idx: usize) {
        if !self.layout.metrics(idx).is_some_and(|m| m.collapsible) {
            return;
        }
        if !self.expanded_indices.remove(&idx) {
            self.expanded_indices.insert(idx);
        }
    }

    /// Drop per-message state for indices that no longer exist.
    fn forget_beyond(&mut self, count: usize) {
        self.expanded_indices.retain(|&i| i < count);
        self.inner_offsets.retain(|&i, _| i < count);
        if self.hovered_index.is_some_and(|i| i >= count) {
            self.hovered_index = None;
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    pub is_loading: bool,
    pub spinner_frame: usize,
}

/// The in-flight indicator: a pulsing shield and three bouncing dots.
pub fn loading_line(frame: usize) -> Line<'static> {
    let shield = if (frame / 4) % 2 == 0 {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM)
    };
    let active = (frame / 3) % 3;
    let mut spans = vec![
        Span::styled("⛨", shield),
        Span::styled(" CyRA is analyzing ", Style::default().fg(Color::Gray)),
    ];
    spans.extend((0..3).map(|i| {
        if i == active {
            Span::styled("●", Style::default().fg(Color::Cyan))
        } else {
            Span::styled("·", Style::default().fg(Color::DarkGray))
        }
    }));
    Line::from(spans)
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let count = self.messages.len();

        if count < self.state.layout.count() {
            self.state.forget_beyond(count);
        }

        // 1. Measure anything not already cached
        let expanded = &self.state.expanded_indices;
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(count, content_width, expanded);
        layout.metrics.truncate(reusable);
        for (i, message) in self.messages.iter().enumerate().skip(reusable) {
            let view = render::render(message);
            layout
                .metrics
                .push(Message::measure(&view, content_width, expanded.contains(&i)));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(count, content_width, expanded);

        let total_height = self.state.layout.total_height();
        let indicator = if self.is_loading { INDICATOR_ROWS } else { 0 };
        self.state.canvas_height = total_height.saturating_add(indicator);
        self.state.area = area;

        // 2. Settle the offset before computing what is visible; hit testing
        // relies on it being exact
        if self.state.stick_to_bottom {
            let bottom = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: bottom });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, self.state.canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible {
            let (top, height) = self.state.layout.span(i);
            let view = render::render(&self.messages[i]);
            let message = Message {
                view: &view,
                is_hovered: self.state.hovered_index == Some(i),
                is_expanded: self.state.expanded_indices.contains(&i),
                inner_offset: self.state.inner_offsets.get(&i).copied().unwrap_or(0),
            };
            scroll_view.render_widget(message, Rect::new(0, top, content_width, height));
        }

        if self.is_loading {
            let row = Rect::new(0, total_height.saturating_add(1), content_width, 1);
            scroll_view.render_widget(Paragraph::new(loading_line(self.spinner_frame)), row);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Mouse events carry screen coordinates, so hit testing runs against the
/// area recorded during the last render.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match *event {
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::MouseScrollUp(col, row) => {
                let handled = self
                    .hit_test(col, row)
                    .is_some_and(|idx| self.scroll_inner(idx, false));
                if !handled {
                    self.scroll_up();
                }
            }
            TuiEvent::MouseScrollDown(col, row) => {
                let handled = self
                    .hit_test(col, row)
                    .is_some_and(|idx| self.scroll_inner(idx, true));
                if !handled {
                    self.scroll_down();
                }
            }
            TuiEvent::MouseMove(col, row) => {
                self.hovered_index = self.hit_test(col, row);
            }
            TuiEvent::MouseClick(col, row) => {
                if let Some(idx) = self.hit_test(col, row) {
                    self.toggle(idx);
                }
            }
            _ => {}
        }
        None
    }
}

/// Cached per-message measurements
pub struct LayoutCache {
    metrics: Vec<Metrics>,
    /// Running bottom edge of each message
    prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
    /// Expansion set the cached heights were measured with
    cached_expanded: HashSet<usize>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            metrics: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
            cached_expanded: HashSet::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.message_count
    }

    pub fn metrics(&self, idx: usize) -> Option<Metrics> {
        self.metrics.get(idx).copied()
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// How many leading entries can be kept as they are.
    pub fn reusable_count(
        &self,
        message_count: usize,
        content_width: u16,
        expanded: &HashSet<usize>,
    ) -> usize {
        if self.content_width != content_width || message_count < self.message_count {
            return 0;
        }
        let mut reusable = self.metrics.len().min(message_count);
        if let Some(earliest) = expanded.symmetric_difference(&self.cached_expanded).min() {
            reusable = reusable.min(*earliest);
        }
        reusable
    }

    pub fn update_metadata(
        &mut self,
        message_count: usize,
        content_width: u16,
        expanded: &HashSet<usize>,
    ) {
        self.message_count = message_count;
        self.content_width = content_width;
        self.cached_expanded = expanded.clone();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .metrics
            .iter()
            .scan(0u16, |acc, m| {
                *acc = acc.saturating_add(m.height);
                Some(*acc)
            })
            .collect();
    }

    /// Top row and height of message `idx` in content coordinates.
    pub fn span(&self, idx: usize) -> (u16, u16) {
        let top = if idx == 0 { 0 } else { self.prefix_heights[idx - 1] };
        (top, self.prefix_heights[idx] - top)
    }

    pub fn index_at(&self, content_y: u16) -> Option<usize> {
        let idx = self.prefix_heights.partition_point(|&bottom| bottom <= content_y);
        (idx < self.prefix_heights.len()).then_some(idx)
    }

    /// Messages intersecting the viewport, plus half a screen either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let margin = viewport_height / 2;
        let from = scroll_offset.saturating_sub(margin);
        let to = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(margin);

        let start = self.prefix_heights.partition_point(|&bottom| bottom <= from);
        let end = self
            .prefix_heights
            .partition_point(|&bottom| bottom < to)
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end.max(start)
    }
}
