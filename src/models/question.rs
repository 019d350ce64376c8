use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media kind of an answer option. Only `Text` is rendered; the others are
/// carried through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    #[default]
    Text,
    Image,
    Audio,
    Video,
}

/// One answer option of a quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "fileID", default)]
    pub file_id: String,
    #[serde(rename = "type", default)]
    pub kind: OptionKind,
    #[serde(default)]
    pub correct: bool,
    #[serde(
        rename = "optionUUID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub option_uuid: Option<String>,
}

impl QuizOption {
    /// An empty, incorrect text option with a freshly generated identifier.
    pub fn blank() -> Self {
        Self {
            text: String::new(),
            file_id: String::new(),
            kind: OptionKind::Text,
            correct: false,
            option_uuid: Some(format!("option_{}", Uuid::new_v4())),
        }
    }
}

/// A multiple-choice question as stored in a quiz task's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "questionText", default)]
    pub question_text: String,
    #[serde(
        rename = "questionUUID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub question_uuid: Option<String>,
    #[serde(default)]
    pub options: Vec<QuizOption>,
}

impl Question {
    /// An empty question seeded with a single blank option.
    pub fn blank() -> Self {
        Self {
            question_text: String::new(),
            question_uuid: Some(format!("question_{}", Uuid::new_v4())),
            options: vec![QuizOption::blank()],
        }
    }
}
