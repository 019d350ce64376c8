//! Wire protocol of the assignment-task service.

mod messages;

pub use messages::{ClientMessage, DEFAULT_PORT, ServerMessage};
