//! Assignment-task service.
//!
//! Hosts task records over WebSocket for quiz blocks to fetch and save.

mod server;
mod state;

pub use server::{run, serve};
pub use state::TaskStore;
