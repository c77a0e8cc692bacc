//! # TUI Components
//!
//! Every piece of the CyRA screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from data borrowed out of `App`:
//! - `StatusBar`: product name and backend liveness
//! - `Message`: one conversation entry (text, code, table or chart)
//! - `ChartPlot`: the plot area of a chart message
//! - `SubmitButton` / `ReceiptCard`: the report column below the input
//! - `Toasts`: notification overlay
//!
//! ### Stateful Components (Event-Driven)
//!
//! Own state that outlives a frame and react to `TuiEvent`s:
//! - `InputBox`: chat prompt and report summary editors
//! - `MessageList`: scrollable conversation with layout caching
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as struct fields, never by reaching into
//! the `App`. The event loop decides what each component sees:
//!
//! ```rust,ignore
//! StatusBar { status: &app.status }.render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── status_bar.rs    (top line)
//! ├── message.rs       (single message renderer)
//! ├── chart.rs         (bar / line / pie plots)
//! ├── message_list.rs  (scrollable message container)
//! ├── report_panel.rs  (submit button, receipt card)
//! ├── toast.rs         (notification overlay)
//! └── input_box/       (multi-line text input)
//! ```

pub mod chart;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod report_panel;
pub mod status_bar;
pub mod toast;

pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use report_panel::{ReceiptCard, SubmitButton};
pub use status_bar::StatusBar;
pub use toast::Toasts;
