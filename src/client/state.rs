//! Client state management.

use std::time::{Duration, Instant};

use crate::block::QuizBlock;
use crate::context::TaskContext;
use crate::notify::Notification;
use crate::view::{self, Row};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Whether keys move the cursor or type into a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Navigate,
    /// Editing the text of a question or option row.
    Editing { row: Row, buffer: String },
}

#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    shown_at: Instant,
}

/// Client application state.
pub struct ClientApp {
    pub block: QuizBlock,
    pub context: TaskContext,
    /// Index into the current rows.
    cursor: usize,
    mode: InputMode,
    toast: Option<Toast>,
    server_addr: String,
    /// Whether the client should quit.
    pub should_quit: bool,
}

impl ClientApp {
    pub fn new(block: QuizBlock, server_addr: String) -> Self {
        Self {
            block,
            context: TaskContext::new(),
            cursor: 0,
            mode: InputMode::Navigate,
            toast: None,
            server_addr,
            should_quit: false,
        }
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    pub fn rows(&self) -> Vec<Row> {
        view::rows(self.block.store().questions(), self.block.view())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focused_row(&self) -> Option<Row> {
        self.rows().get(self.cursor).copied()
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, InputMode::Editing { .. })
    }

    pub fn move_down(&mut self) {
        let last = self.rows().len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(last);
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Keep the cursor on an existing row after the store changed.
    pub fn clamp_cursor(&mut self) {
        let last = self.rows().len().saturating_sub(1);
        self.cursor = self.cursor.min(last);
    }

    /// Enter on the focused row: edit text, or run the "+" control.
    pub fn activate(&mut self) {
        match self.focused_row() {
            Some(row @ (Row::Question(_) | Row::Option { .. })) => self.begin_edit(row),
            Some(Row::AddOption(question)) => self.add_option(question),
            Some(Row::AddQuestion) => self.add_question(),
            None => {}
        }
    }

    fn begin_edit(&mut self, row: Row) {
        let questions = self.block.store().questions();
        let text = match row {
            Row::Question(q) => questions.get(q).map(|q| q.question_text.clone()),
            Row::Option { question, option } => questions
                .get(question)
                .and_then(|q| q.options.get(option))
                .map(|o| o.text.clone()),
            _ => None,
        };

        if let Some(buffer) = text {
            if self.block.view().is_editable() {
                self.mode = InputMode::Editing { row, buffer };
            }
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let InputMode::Editing { buffer, .. } = &mut self.mode {
            buffer.push(c);
        }
        self.apply_edit();
    }

    pub fn input_backspace(&mut self) {
        if let InputMode::Editing { buffer, .. } = &mut self.mode {
            buffer.pop();
        }
        self.apply_edit();
    }

    pub fn finish_edit(&mut self) {
        self.mode = InputMode::Navigate;
    }

    /// Write the edit buffer through to the store, one keystroke at a time.
    fn apply_edit(&mut self) {
        let InputMode::Editing { row, buffer } = &self.mode else {
            return;
        };
        let (row, text) = (*row, buffer.clone());
        let Some(store) = self.block.store_mut() else {
            return;
        };
        match row {
            Row::Question(q) => store.set_question_text(q, text),
            Row::Option { question, option } => store.set_option_text(question, option, text),
            _ => {}
        }
    }

    pub fn toggle_correct(&mut self) {
        if let Some(Row::Option { question, option }) = self.focused_row() {
            if let Some(store) = self.block.store_mut() {
                store.toggle_correct(question, option);
            }
        }
    }

    /// Append an option to the question under the cursor and focus it.
    pub fn add_option_to_focused(&mut self) {
        if let Some(question) = self.focused_row().and_then(Row::question) {
            self.add_option(question);
        }
    }

    fn add_option(&mut self, question: usize) {
        let Some(store) = self.block.store_mut() else {
            return;
        };
        store.add_option(question);
        let Some(option) = store
            .questions()
            .get(question)
            .and_then(|q| q.options.len().checked_sub(1))
        else {
            return;
        };
        self.focus(Row::Option { question, option });
    }

    pub fn add_question(&mut self) {
        let Some(store) = self.block.store_mut() else {
            return;
        };
        store.add_question();
        let question = store.len() - 1;
        self.focus(Row::Question(question));
    }

    /// Remove the focused question or option.
    pub fn remove_focused(&mut self) {
        let row = self.focused_row();
        let Some(store) = self.block.store_mut() else {
            return;
        };
        match row {
            Some(Row::Question(q)) => store.remove_question(q),
            Some(Row::Option { question, option }) => store.remove_option(question, option),
            _ => return,
        }
        self.clamp_cursor();
    }

    fn focus(&mut self, target: Row) {
        if let Some(index) = self.rows().iter().position(|row| *row == target) {
            self.cursor = index;
        }
    }

    /// The store was replaced from outside (sync or fetch).
    pub fn store_replaced(&mut self) {
        self.mode = InputMode::Navigate;
        self.clamp_cursor();
    }

    pub fn show(&mut self, notification: Notification) {
        self.toast = Some(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }

    /// The toast to display at `now`, if it has not expired.
    pub fn toast(&self, now: Instant) -> Option<&Notification> {
        self.toast
            .as_ref()
            .filter(|toast| now.duration_since(toast.shown_at) < TOAST_DURATION)
            .map(|toast| &toast.notification)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::block::QuizBlockDeps;
    use crate::context::{AssignmentRef, Session};
    use crate::models::ViewMode;
    use crate::service::mock::MockTaskService;

    fn app(view: ViewMode) -> ClientApp {
        let (tasks, _) = mpsc::unbounded_channel();
        let (notifications, _) = mpsc::unbounded_channel();
        let deps = QuizBlockDeps {
            service: Arc::new(MockTaskService::new()),
            session: Session::default(),
            assignment: AssignmentRef::new("assignment_1"),
            tasks,
            notifications,
        };
        let block = QuizBlock::new(view, Some("task_1".to_string()), deps);
        ClientApp::new(block, "127.0.0.1:8713".to_string())
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut app = app(ViewMode::Teacher);
        // Question, option, add option, add question.
        assert_eq!(app.rows().len(), 4);

        app.move_up();
        assert_eq!(app.cursor(), 0);
        for _ in 0..10 {
            app.move_down();
        }
        assert_eq!(app.focused_row(), Some(Row::AddQuestion));
    }

    #[test]
    fn test_typing_edits_question_text() {
        let mut app = app(ViewMode::Teacher);
        app.activate();
        assert!(app.is_editing());

        for c in "Why?!".chars() {
            app.input_char(c);
        }
        app.input_backspace();
        app.finish_edit();

        assert_eq!(app.block.store().questions()[0].question_text, "Why?");
        assert!(!app.is_editing());
    }

    #[test]
    fn test_typing_edits_option_text() {
        let mut app = app(ViewMode::Teacher);
        app.move_down();
        app.activate();
        app.input_char('B');
        app.finish_edit();

        assert_eq!(app.block.store().questions()[0].options[0].text, "B");
    }

    #[test]
    fn test_add_controls_focus_new_rows() {
        let mut app = app(ViewMode::Teacher);
        app.move_down();
        app.move_down();
        assert_eq!(app.focused_row(), Some(Row::AddOption(0)));

        app.activate();
        assert_eq!(app.block.store().questions()[0].options.len(), 2);
        assert_eq!(app.focused_row(), Some(Row::Option { question: 0, option: 1 }));

        app.add_question();
        assert_eq!(app.block.store().len(), 2);
        assert_eq!(app.focused_row(), Some(Row::Question(1)));
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut app = app(ViewMode::Teacher);
        app.add_option_to_focused();
        app.toggle_correct();
        assert!(app.block.store().questions()[0].options[1].correct);

        app.remove_focused();
        assert_eq!(app.block.store().questions()[0].options.len(), 1);

        app.move_up();
        app.move_up();
        app.remove_focused();
        assert!(app.block.store().is_empty());
        assert_eq!(app.focused_row(), Some(Row::AddQuestion));
    }

    #[test]
    fn test_student_view_is_read_only() {
        let mut app = app(ViewMode::Student);
        let before = app.block.store().clone();

        app.activate();
        app.input_char('x');
        app.toggle_correct();
        app.add_option_to_focused();
        app.add_question();
        app.remove_focused();

        assert!(!app.is_editing());
        assert_eq!(app.block.store(), &before);
    }

    #[test]
    fn test_toast_expires() {
        let mut app = app(ViewMode::Teacher);
        let now = Instant::now();
        assert!(app.toast(now).is_none());

        app.show(Notification::success("Task saved successfully"));
        let shown = Instant::now();
        assert!(app.toast(shown).is_some());
        assert!(app.toast(shown + TOAST_DURATION).is_none());
    }
}
