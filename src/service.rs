//! Client side of the assignment-task service.

use std::fmt;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, instrument};

use crate::models::{AssignmentTask, TaskUpdate};
use crate::protocol::{ClientMessage, ServerMessage};

/// Error talking to the task service.
#[derive(Debug)]
pub enum ServiceError {
    /// Connecting or exchanging frames failed.
    Transport(tungstenite::Error),
    /// A message could not be encoded or decoded.
    Json(serde_json::Error),
    /// The service refused the request.
    Rejected(String),
    /// The connection closed before a reply arrived.
    Closed,
    /// The service answered with a reply of the wrong kind.
    UnexpectedReply,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Transport(e) => write!(f, "Transport error: {}", e),
            ServiceError::Json(e) => write!(f, "Malformed message: {}", e),
            ServiceError::Rejected(reason) => write!(f, "Request rejected: {}", reason),
            ServiceError::Closed => write!(f, "Connection closed before a reply"),
            ServiceError::UnexpectedReply => write!(f, "Unexpected reply from service"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Transport(e) => Some(e),
            ServiceError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tungstenite::Error> for ServiceError {
    fn from(err: tungstenite::Error) -> Self {
        ServiceError::Transport(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Json(err)
    }
}

/// Fetch and update operations on assignment tasks.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn get_task(
        &self,
        task_uuid: &str,
        token: Option<&str>,
    ) -> Result<AssignmentTask, ServiceError>;

    async fn update_task(
        &self,
        update: &TaskUpdate,
        task_uuid: &str,
        assignment_uuid: &str,
        token: Option<&str>,
    ) -> Result<(), ServiceError>;
}

/// [`TaskService`] over WebSocket, one connection per request.
#[derive(Debug, Clone)]
pub struct WsTaskService {
    url: String,
}

impl WsTaskService {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            url: format!("ws://{}:{}", host, port),
        }
    }

    async fn round_trip(&self, request: ClientMessage) -> Result<ServerMessage, ServiceError> {
        let (mut ws, _) = tokio_tungstenite::connect_async(&self.url).await?;

        let json = serde_json::to_string(&request)?;
        ws.send(Message::Text(json.into())).await?;

        while let Some(frame) = ws.next().await {
            match frame? {
                Message::Text(text) => {
                    let reply: ServerMessage = serde_json::from_str(text.as_str())?;
                    if let Err(e) = ws.close(None).await {
                        debug!(error = %e, "close after reply failed");
                    }
                    return Ok(reply);
                }
                Message::Close(_) => break,
                _ => continue,
            }
        }

        Err(ServiceError::Closed)
    }
}

#[async_trait]
impl TaskService for WsTaskService {
    #[instrument(skip(self, token))]
    async fn get_task(
        &self,
        task_uuid: &str,
        token: Option<&str>,
    ) -> Result<AssignmentTask, ServiceError> {
        let reply = self
            .round_trip(ClientMessage::GetTask {
                task_uuid: task_uuid.to_string(),
                token: token.map(str::to_string),
            })
            .await?;

        match reply {
            ServerMessage::Task { task } => {
                debug!("task fetched");
                Ok(task)
            }
            ServerMessage::Rejected { reason } => Err(ServiceError::Rejected(reason)),
            ServerMessage::TaskUpdated { .. } => Err(ServiceError::UnexpectedReply),
        }
    }

    #[instrument(skip(self, update, token))]
    async fn update_task(
        &self,
        update: &TaskUpdate,
        task_uuid: &str,
        assignment_uuid: &str,
        token: Option<&str>,
    ) -> Result<(), ServiceError> {
        let reply = self
            .round_trip(ClientMessage::UpdateTask {
                task_uuid: task_uuid.to_string(),
                assignment_uuid: assignment_uuid.to_string(),
                token: token.map(str::to_string),
                update: update.clone(),
            })
            .await?;

        match reply {
            ServerMessage::TaskUpdated { .. } => {
                debug!("task updated");
                Ok(())
            }
            ServerMessage::Rejected { reason } => Err(ServiceError::Rejected(reason)),
            ServerMessage::Task { .. } => Err(ServiceError::UnexpectedReply),
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::Mutex;

    use super::*;

    /// One recorded `update_task` call.
    #[derive(Debug, Clone)]
    pub struct RecordedUpdate {
        pub update: TaskUpdate,
        pub task_uuid: String,
        pub assignment_uuid: String,
        pub token: Option<String>,
    }

    /// In-memory [`TaskService`] that records calls.
    #[derive(Default)]
    pub struct MockTaskService {
        task: Option<AssignmentTask>,
        fail: bool,
        updates: Mutex<Vec<RecordedUpdate>>,
        fetches: Mutex<usize>,
    }

    impl MockTaskService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_task(task: AssignmentTask) -> Self {
            Self {
                task: Some(task),
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn updates(&self) -> Vec<RecordedUpdate> {
            self.updates.lock().unwrap().clone()
        }

        pub fn fetch_count(&self) -> usize {
            *self.fetches.lock().unwrap()
        }
    }

    #[async_trait]
    impl TaskService for MockTaskService {
        async fn get_task(
            &self,
            task_uuid: &str,
            _token: Option<&str>,
        ) -> Result<AssignmentTask, ServiceError> {
            *self.fetches.lock().unwrap() += 1;
            if self.fail {
                return Err(ServiceError::Closed);
            }
            self.task
                .clone()
                .filter(|task| task.assignment_task_uuid == task_uuid)
                .ok_or_else(|| ServiceError::Rejected("unknown task".to_string()))
        }

        async fn update_task(
            &self,
            update: &TaskUpdate,
            task_uuid: &str,
            assignment_uuid: &str,
            token: Option<&str>,
        ) -> Result<(), ServiceError> {
            self.updates.lock().unwrap().push(RecordedUpdate {
                update: update.clone(),
                task_uuid: task_uuid.to_string(),
                assignment_uuid: assignment_uuid.to_string(),
                token: token.map(str::to_string),
            });
            if self.fail {
                Err(ServiceError::Rejected("unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }
}
