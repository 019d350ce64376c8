//! Task store behind the service.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::data::{LoadError, load_tasks_from_json, write_tasks_to_json};
use crate::models::{AssignmentTask, TaskUpdate};
use crate::protocol::{ClientMessage, ServerMessage};

/// All tasks known to the service, keyed by task identifier.
pub struct TaskStore {
    tasks: HashMap<String, AssignmentTask>,
    /// Task order as loaded, so the file is rewritten stably.
    order: Vec<String>,
    /// Where updates are persisted. `None` keeps everything in memory.
    path: Option<PathBuf>,
    /// Bearer token every request must carry, when set.
    token: Option<String>,
}

impl TaskStore {
    pub fn new(tasks: Vec<AssignmentTask>, token: Option<String>) -> Self {
        let order = tasks
            .iter()
            .map(|task| task.assignment_task_uuid.clone())
            .collect();
        let tasks = tasks
            .into_iter()
            .map(|task| (task.assignment_task_uuid.clone(), task))
            .collect();
        Self {
            tasks,
            order,
            path: None,
            token,
        }
    }

    /// Load tasks from a JSON file and persist updates back into it.
    pub fn open(path: PathBuf, token: Option<String>) -> Result<Self, LoadError> {
        let tasks = load_tasks_from_json(&path)?;
        let mut store = Self::new(tasks, token);
        store.path = Some(path);
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, task_uuid: &str) -> Option<&AssignmentTask> {
        self.tasks.get(task_uuid)
    }

    /// Answer one request.
    pub async fn handle(&mut self, msg: ClientMessage) -> ServerMessage {
        match msg {
            ClientMessage::GetTask { task_uuid, token } => {
                if let Err(reason) = self.authorize(token.as_deref()) {
                    return rejected(reason);
                }
                match self.tasks.get(&task_uuid) {
                    Some(task) => ServerMessage::Task { task: task.clone() },
                    None => rejected(format!("unknown task {}", task_uuid)),
                }
            }
            ClientMessage::UpdateTask {
                task_uuid,
                assignment_uuid,
                token,
                update,
            } => {
                if let Err(reason) = self.authorize(token.as_deref()) {
                    return rejected(reason);
                }
                match self.update(&task_uuid, &assignment_uuid, update).await {
                    Ok(()) => ServerMessage::TaskUpdated { task_uuid },
                    Err(reason) => rejected(reason),
                }
            }
        }
    }

    fn authorize(&self, token: Option<&str>) -> Result<(), String> {
        match &self.token {
            Some(expected) if token != Some(expected.as_str()) => {
                Err("unauthorized".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Replace a task's contents. The in-memory copy only changes once the
    /// file write, if any, has succeeded.
    async fn update(
        &mut self,
        task_uuid: &str,
        assignment_uuid: &str,
        update: TaskUpdate,
    ) -> Result<(), String> {
        let task = self
            .tasks
            .get(task_uuid)
            .ok_or_else(|| format!("unknown task {}", task_uuid))?;

        if task.assignment_uuid != assignment_uuid {
            return Err(format!(
                "task {} does not belong to assignment {}",
                task_uuid, assignment_uuid
            ));
        }

        let mut updated = task.clone();
        updated.contents = Some(update.contents);

        self.persist(&updated).await?;

        info!(task = task_uuid, "task contents updated");
        self.tasks.insert(task_uuid.to_string(), updated);
        Ok(())
    }

    /// Write every task to the backing file, with `updated` in place of
    /// its stored version.
    async fn persist(&self, updated: &AssignmentTask) -> Result<(), String> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        let tasks: Vec<AssignmentTask> = self
            .order
            .iter()
            .filter_map(|uuid| {
                if *uuid == updated.assignment_task_uuid {
                    Some(updated.clone())
                } else {
                    self.tasks.get(uuid).cloned()
                }
            })
            .collect();

        let path_display = path.display().to_string();
        match tokio::task::spawn_blocking(move || write_tasks_to_json(&path, &tasks)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                warn!(error = %e, path = %path_display, "failed to persist tasks");
                Err("could not store task".to_string())
            }
            Err(e) => {
                warn!(error = %e, path = %path_display, "task file writer did not finish");
                Err("could not store task".to_string())
            }
        }
    }
}

fn rejected(reason: impl Into<String>) -> ServerMessage {
    ServerMessage::Rejected {
        reason: reason.into(),
    }
}
