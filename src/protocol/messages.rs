//! Protocol messages between the quiz block and the task service.
//!
//! Each request is one JSON text frame over WebSocket and is answered by
//! exactly one reply frame.

use serde::{Deserialize, Serialize};

use crate::models::{AssignmentTask, TaskUpdate};

/// Requests sent to the task service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Fetch one task record.
    GetTask {
        task_uuid: String,
        token: Option<String>,
    },

    /// Replace the contents of a task.
    UpdateTask {
        task_uuid: String,
        assignment_uuid: String,
        token: Option<String>,
        update: TaskUpdate,
    },
}

/// Replies from the task service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The requested task.
    Task { task: AssignmentTask },

    /// Update stored.
    TaskUpdated { task_uuid: String },

    /// Request refused (unknown task, bad token, malformed request).
    Rejected { reason: String },
}

/// Default service port.
pub const DEFAULT_PORT: u16 = 8713;
