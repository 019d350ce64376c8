//! Shared context the quiz block runs in.
//!
//! The session, the owning assignment and the task context are handed to
//! the block explicitly. The block talks back to the task context only
//! through [`TaskCommand`]s.

use tokio::sync::mpsc;

use crate::models::{AssignmentTask, Question};

/// Credentials of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
}

impl Session {
    pub fn new(access_token: Option<String>) -> Self {
        Self { access_token }
    }
}

/// The assignment the task belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRef {
    pub assignment_uuid: String,
}

impl AssignmentRef {
    pub fn new(assignment_uuid: impl Into<String>) -> Self {
        Self {
            assignment_uuid: assignment_uuid.into(),
        }
    }
}

/// Commands a block sends to the task context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Mark this task as the one selected in the editor.
    SetSelectedTask(Option<String>),
    /// Re-fetch the selected task.
    Reload,
}

pub type TaskCommandSender = mpsc::UnboundedSender<TaskCommand>;

/// State of the task currently selected in the assignment editor.
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    selected_task_uuid: Option<String>,
    task: Option<AssignmentTask>,
}

impl TaskContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_task_uuid(&self) -> Option<&str> {
        self.selected_task_uuid.as_deref()
    }

    /// The loaded task record, if it matches the selection.
    pub fn task(&self) -> Option<&AssignmentTask> {
        self.task.as_ref()
    }

    /// Quiz questions already loaded into the context.
    pub fn quiz_questions(&self) -> Option<&[Question]> {
        self.task.as_ref()?.quiz_questions()
    }

    /// Identifier of the task a save should target: the loaded task, else
    /// the selection.
    pub fn target_task_uuid(&self) -> Option<&str> {
        self.task
            .as_ref()
            .map(|task| task.assignment_task_uuid.as_str())
            .or(self.selected_task_uuid.as_deref())
    }

    /// Apply a command. Returns true when the selected task needs fetching.
    pub fn apply(&mut self, command: TaskCommand) -> bool {
        match command {
            TaskCommand::SetSelectedTask(uuid) => {
                if self.selected_task_uuid == uuid {
                    return false;
                }
                let stale = self
                    .task
                    .as_ref()
                    .is_some_and(|task| Some(&task.assignment_task_uuid) != uuid.as_ref());
                if stale {
                    self.task = None;
                }
                self.selected_task_uuid = uuid;
                self.selected_task_uuid.is_some()
            }
            TaskCommand::Reload => self.selected_task_uuid.is_some(),
        }
    }

    /// Store a fetched task. Ignored when the selection moved on meanwhile.
    pub fn set_task(&mut self, task: AssignmentTask) -> bool {
        if self.selected_task_uuid.as_deref() != Some(task.assignment_task_uuid.as_str()) {
            return false;
        }
        self.task = Some(task);
        true
    }
}
