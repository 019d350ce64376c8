//! Render projection: which rows a quiz shows in each view mode.

use crate::models::{Question, ViewMode};

/// One visual row of the quiz block, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Question(usize),
    Option { question: usize, option: usize },
    /// "+" control after a question's options. Teacher view only.
    AddOption(usize),
    /// Trailing "Add Question" control. Teacher view only.
    AddQuestion,
}

impl Row {
    pub fn question(self) -> Option<usize> {
        match self {
            Row::Question(question) | Row::AddOption(question) => Some(question),
            Row::Option { question, .. } => Some(question),
            Row::AddQuestion => None,
        }
    }
}

pub fn rows(questions: &[Question], view: ViewMode) -> Vec<Row> {
    let editable = view.is_editable();
    let mut rows = Vec::new();

    for (question, q) in questions.iter().enumerate() {
        rows.push(Row::Question(question));
        rows.extend((0..q.options.len()).map(|option| Row::Option { question, option }));
        if editable {
            rows.push(Row::AddOption(question));
        }
    }

    if editable {
        rows.push(Row::AddQuestion);
    }

    rows
}

/// Positional option label: A, B, ... Z, AA, AB, ...
pub fn option_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}
