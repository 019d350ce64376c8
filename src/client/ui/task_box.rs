//! Assignment box chrome around a task block.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding};

use crate::models::{TaskType, ViewMode};

/// Draw the box and return the area left for the block body.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    task_type: TaskType,
    view: ViewMode,
    saving: bool,
) -> Rect {
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", task_type.label()),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("· {} view ", view.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .padding(Padding::horizontal(1));

    if view.is_editable() {
        let save = if saving {
            Span::styled(" saving... ", Style::default().fg(Color::Yellow))
        } else {
            Span::styled(" [s] save ", Style::default().fg(Color::Green).bold())
        };
        block = block.title_bottom(Line::from(save).right_aligned());
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}
