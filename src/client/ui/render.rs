//! Main client UI renderer.

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::client::state::ClientApp;
use crate::models::TaskType;
use crate::notify::{Notification, NotificationKind};

use super::{quiz, task_box};

/// Render the quiz block inside its assignment box.
pub fn render(frame: &mut Frame, app: &ClientApp) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([
        Constraint::Min(3),    // Assignment box
        Constraint::Length(1), // Toast
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    let inner = task_box::render(
        frame,
        chunks[0],
        TaskType::Quiz,
        app.block.view(),
        app.block.is_saving(),
    );
    quiz::render(frame, inner, app);

    render_status(frame, chunks[1], app);
    render_controls(frame, chunks[2], app);
}

fn render_status(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let widget = match app.toast(Instant::now()) {
        Some(notification) => toast(notification),
        None => Paragraph::new(format!("task service {}", app.server_addr()))
            .alignment(Alignment::Right)
            .fg(Color::DarkGray),
    };
    frame.render_widget(widget, area);
}

fn toast(notification: &Notification) -> Paragraph<'static> {
    let color = match notification.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
    };
    Paragraph::new(notification.message.clone())
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).bold())
}

fn render_controls(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let help = if app.is_editing() {
        "type to edit  ·  enter/esc done"
    } else if app.block.view().is_editable() {
        concat!(
            "j/k move  ·  enter edit  ·  space correct  ·  o option  ·  ",
            "a question  ·  x remove  ·  s save  ·  q quit",
        )
    } else {
        "j/k scroll  ·  q quit"
    };

    let widget = Paragraph::new(help)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    use super::*;
    use crate::block::{QuizBlock, QuizBlockDeps};
    use crate::context::{AssignmentRef, Session};
    use crate::models::ViewMode;
    use crate::service::mock::MockTaskService;

    fn screen_text(view: ViewMode) -> String {
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
        let mut app = ClientApp::new(block, "127.0.0.1:8713".to_string());
        app.show(Notification::success("Task saved successfully"));

        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_teacher_screen() {
        let text = screen_text(ViewMode::Teacher);
        assert!(text.contains("Quiz"));
        assert!(text.contains("teacher view"));
        assert!(text.contains("[s] save"));
        assert!(text.contains("Add Question"));
        assert!(text.contains("Task saved successfully"));
    }

    #[test]
    fn test_student_screen() {
        let text = screen_text(ViewMode::Student);
        assert!(text.contains("student view"));
        assert!(!text.contains("[s] save"));
        assert!(!text.contains("Add Question"));
    }
}
