//! # Core Application Logic
//!
//! This module contains CyRA's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • render() (views)     │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │    API     │
//!         │  Adapter   │                  │  Backend   │
//!         │ (ratatui)  │                  │ (reqwest)  │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`message`] / [`conversation`]: chat history
//! - [`render`]: presentation decision per message (uses [`fence`])
//! - [`notify`]: transient notifications
//! - [`status`]: backend liveness and the periodic poller
//! - [`tasks`]: async request tasks that yield actions
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod conversation;
pub mod fence;
pub mod message;
pub mod notify;
pub mod render;
pub mod state;
pub mod status;
pub mod tasks;
