mod question;
mod task;

pub use question::{OptionKind, Question, QuizOption};
pub use task::{AssignmentTask, TaskContents, TaskType, TaskUpdate, ViewMode};
