//! View-state store for the quiz block.
//!
//! Holds the ordered list of questions being authored or presented. Every
//! mutator changes exactly one thing; indices outside the current list are
//! ignored.

use tracing::debug;

use crate::models::{Question, QuizOption, TaskUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionStore {
    questions: Vec<Question>,
}

impl QuestionStore {
    /// A store seeded with one empty question holding one empty option.
    pub fn new() -> Self {
        Self {
            questions: vec![Question::blank()],
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Replace the whole store, e.g. with freshly fetched contents.
    pub fn replace(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    /// Snapshot of the store as an update request body.
    pub fn to_update(&self) -> TaskUpdate {
        TaskUpdate::questions(self.questions.clone())
    }

    pub fn set_question_text(&mut self, question: usize, text: impl Into<String>) {
        if let Some(q) = self.question_mut(question) {
            q.question_text = text.into();
        }
    }

    pub fn set_option_text(&mut self, question: usize, option: usize, text: impl Into<String>) {
        if let Some(o) = self.option_mut(question, option) {
            o.text = text.into();
        }
    }

    pub fn add_option(&mut self, question: usize) {
        if let Some(q) = self.question_mut(question) {
            q.options.push(QuizOption::blank());
        }
    }

    pub fn remove_option(&mut self, question: usize, option: usize) {
        match self.question_mut(question) {
            Some(q) if option < q.options.len() => {
                q.options.remove(option);
            }
            _ => debug!(question, option, "remove_option ignored: no such option"),
        }
    }

    pub fn add_question(&mut self) {
        self.questions.push(Question::blank());
    }

    pub fn remove_question(&mut self, question: usize) {
        if question < self.questions.len() {
            self.questions.remove(question);
        } else {
            debug!(question, "remove_question ignored: no such question");
        }
    }

    /// Flip the `correct` flag of one option. Siblings are left alone, so a
    /// question may end up with several correct options.
    pub fn toggle_correct(&mut self, question: usize, option: usize) {
        if let Some(o) = self.option_mut(question, option) {
            o.correct = !o.correct;
        }
    }

    fn question_mut(&mut self, question: usize) -> Option<&mut Question> {
        let found = self.questions.get_mut(question);
        if found.is_none() {
            debug!(question, "no question at index");
        }
        found
    }

    fn option_mut(&mut self, question: usize, option: usize) -> Option<&mut QuizOption> {
        let found = self
            .question_mut(question)
            .and_then(|q| q.options.get_mut(option));
        if found.is_none() {
            debug!(question, option, "no option at index");
        }
        found
    }
}

impl Default for QuestionStore {
    fn default() -> Self {
        Self::new()
    }
}
