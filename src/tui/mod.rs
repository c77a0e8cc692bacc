//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates terminal events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Concurrency
//!
//! The event loop runs on the main thread. Every backend call is a
//! `tokio::spawn`ed task that reports back over a std `mpsc` channel as a
//! single `Action`; the status poller sends over the same channel. Chat and
//! report requests are independent, so one panel stays usable while the
//! other waits.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (a request in flight, or a toast showing): draws every
//!   ~80ms for the spinners and toast expiry.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.

mod component;
mod components;
mod event;
mod highlight;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Rect;
use tokio_util::sync::CancellationToken;

use crate::api::{Backend, HttpBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::status::StatusPoller;
use crate::core::tasks;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const CHAT_PLACEHOLDER: &str =
    "Describe the security incident or ask about ISRO system status...";
const REPORT_PLACEHOLDER: &str = "Enter detailed security incident report, analysis findings, or threat intelligence summary...";

/// Which input receives keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Chat,
    Report,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Chat => Focus::Report,
            Focus::Report => Focus::Chat,
        }
    }
}

/// Screen regions from the last frame, for mouse hit testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Areas {
    pub chat_input: Rect,
    pub report_input: Rect,
    pub report_button: Rect,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub chat_input: InputBox,
    pub report_input: InputBox,
    pub focus: Focus,
    pub areas: Areas,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            chat_input: InputBox::new("Message", CHAT_PLACEHOLDER).with_rows(1, 5),
            report_input: InputBox::new("Security Report Summary", REPORT_PLACEHOLDER)
                .with_rows(6, 8),
            focus: Focus::Chat, // User expects to type immediately
            areas: Areas::default(),
        }
    }

    /// Refresh input props from core state before each frame.
    pub fn sync(&mut self, app: &App) {
        self.chat_input.disabled = app.conversation.is_loading();
        self.report_input.disabled = app.report.is_loading;
        self.chat_input.focused = self.focus == Focus::Chat;
        self.report_input.focused = self.focus == Focus::Report;
    }

    fn focused_input(&mut self) -> &mut InputBox {
        match self.focus {
            Focus::Chat => &mut self.chat_input,
            Focus::Report => &mut self.report_input,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol makes Shift+Enter distinguishable; terminals
        // that don't speak it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config.backend_url));
    let mut app = App::from_config(backend.clone(), &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Could not enable terminal modes: {}", e);
            None
        }
    };

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let cancel = CancellationToken::new();
    let poller = StatusPoller::new(backend, tx.clone(), cancel.clone())
        .with_interval(config.status_poll_interval);
    tokio::spawn(poller.run());

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    let result = loop {
        let now = Instant::now();
        app.notifications.prune(now);
        tui.sync(&app);

        let animating = app.conversation.is_loading()
            || app.report.is_loading
            || app.notifications.is_active();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame, now)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = handle_event(&mut tui, event)
                && dispatch(&mut app, &mut tui, action, &tx)
            {
                should_quit = true;
            }
        }
        if should_quit {
            break Ok(());
        }

        // Completions from background tasks
        let mut quit_requested = false;
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut tui, action, &tx) {
                quit_requested = true;
            }
        }
        if quit_requested {
            break Ok(());
        }
    };

    cancel.cancel();
    ratatui::restore();
    info!("CyRA shutting down");
    result
}

/// Terminal event → core action, after TUI-local handling.
fn handle_event(tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Resize => None,
        TuiEvent::ForceQuit => Some(Action::Quit),
        TuiEvent::FocusNext => {
            tui.focus = tui.focus.next();
            None
        }
        TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::MouseScrollUp(..)
        | TuiEvent::MouseScrollDown(..)
        | TuiEvent::MouseMove(..) => {
            tui.message_list.handle_event(&event);
            None
        }
        TuiEvent::MouseClick(col, row) => {
            if let Some(focus) = ui::focus_at(tui, col, row) {
                tui.focus = focus;
                if ui::is_report_button(tui, col, row) && !tui.report_input.disabled {
                    return submit_action(Focus::Report, tui.report_input.text().to_string());
                }
                return None;
            }
            tui.message_list.handle_event(&event);
            None
        }
        _ => {
            let focus = tui.focus;
            match tui.focused_input().handle_event(&event) {
                Some(InputEvent::Submit(text)) => submit_action(focus, text),
                Some(InputEvent::Changed) | None => None,
            }
        }
    }
}

fn submit_action(focus: Focus, text: String) -> Option<Action> {
    if text.trim().is_empty() {
        return None;
    }
    Some(match focus {
        Focus::Chat => Action::SendMessage(text),
        Focus::Report => Action::GenerateReport(text),
    })
}

/// Run an action through the reducer and carry out its effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnChat(request) => {
            tui.chat_input.clear();
            tui.message_list.stick_to_bottom = true;
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let action = tasks::chat(backend.as_ref(), &request).await;
                if tx.send(action).is_err() {
                    warn!("Failed to deliver chat result: receiver dropped");
                }
            });
            false
        }
        Effect::SpawnReport(request) => {
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let action = tasks::report(backend.as_ref(), &request).await;
                if tx.send(action).is_err() {
                    warn!("Failed to deliver report result: receiver dropped");
                }
            });
            false
        }
        Effect::ReportStored => {
            tui.report_input.clear();
            let backend = app.backend.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(action) = tasks::ledger(backend.as_ref()).await
                    && tx.send(action).is_err()
                {
                    warn!("Failed to deliver ledger summary: receiver dropped");
                }
            });
            false
        }
    }
}
