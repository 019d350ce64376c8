//! # quiz-block
//!
//! A multiple-choice quiz block for an assignment editor: teachers author
//! questions and mark correct options, students see the same quiz
//! read-only. The block persists through an assignment-task service.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use quiz_block::{
//!     AssignmentRef, QuizBlock, QuizBlockDeps, Session, TaskContext, ViewMode, WsTaskService,
//! };
//! use tokio::sync::mpsc;
//!
//! # async fn demo() {
//! let (tasks, _task_commands) = mpsc::unbounded_channel();
//! let (notifications, _toasts) = mpsc::unbounded_channel();
//! let deps = QuizBlockDeps {
//!     service: Arc::new(WsTaskService::new("127.0.0.1", 8713)),
//!     session: Session::new(Some("token".to_string())),
//!     assignment: AssignmentRef::new("assignment_1"),
//!     tasks,
//!     notifications,
//! };
//!
//! let mut block = QuizBlock::new(ViewMode::Teacher, Some("task_1".to_string()), deps);
//! let ctx = TaskContext::new();
//! if let Some(store) = block.store_mut() {
//!     store.set_question_text(0, "What does the borrow checker enforce?");
//!     store.add_option(0);
//!     store.toggle_correct(0, 1);
//! }
//! block.save(&ctx).await;
//! # }
//! ```

pub mod block;
pub mod client;
pub mod context;
mod data;
pub mod logging;
mod models;
pub mod notify;
pub mod protocol;
pub mod server;
pub mod service;
pub mod store;
pub mod terminal;
pub mod view;

pub use block::{QuizBlock, QuizBlockDeps};
pub use context::{AssignmentRef, Session, TaskCommand, TaskContext};
pub use data::{LoadError, load_tasks_from_json, write_tasks_to_json};
pub use models::{
    AssignmentTask, OptionKind, Question, QuizOption, TaskContents, TaskType, TaskUpdate, ViewMode,
};
pub use notify::{Notification, NotificationKind};
pub use service::{ServiceError, TaskService, WsTaskService};
pub use store::QuestionStore;
