use serde::{Deserialize, Serialize};

use super::Question;

/// Whether the block is being authored or only presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Teacher,
    Student,
}

impl ViewMode {
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Teacher)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

/// Kind of task inside an assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Quiz,
    FileSubmission,
    Form,
    #[serde(other)]
    Other,
}

impl TaskType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Quiz => "Quiz",
            Self::FileSubmission => "File submission",
            Self::Form => "Form",
            Self::Other => "Task",
        }
    }
}

/// Task-type specific payload. Quizzes keep their questions here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

/// Body of an update request: `{ "contents": { "questions": [...] } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub contents: TaskContents,
}

impl TaskUpdate {
    pub fn questions(questions: Vec<Question>) -> Self {
        Self {
            contents: TaskContents {
                questions: Some(questions),
            },
        }
    }
}

/// A task record as held by the assignment-task service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentTask {
    pub assignment_task_uuid: String,
    pub assignment_uuid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<TaskContents>,
}

impl AssignmentTask {
    /// The quiz questions carried by this task, if any were saved.
    pub fn quiz_questions(&self) -> Option<&[Question]> {
        self.contents.as_ref()?.questions.as_deref()
    }
}
