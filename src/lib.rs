//! DevOps GPT terminal client
//!
//! Exposes the API clients and the session state machine so they can be
//! driven without going through the terminal UI.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod session;
pub mod ui;
pub mod util;
