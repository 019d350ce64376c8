//! Terminal front end for the quiz block.
//!
//! Hosts one block in teacher (editable) or student (read-only) view and
//! talks to the task service over WebSocket.

mod client;
mod state;
mod ui;

pub use client::{ClientConfig, run};
pub use state::{ClientApp, InputMode};
