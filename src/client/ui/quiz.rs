//! Quiz block body: questions and options in teacher or student form.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::client::state::{ClientApp, InputMode};
use crate::models::{Question, QuizOption, ViewMode};
use crate::view::{Row, option_label};

const QUESTION_PLACEHOLDER: &str = "Question";
const OPTION_PLACEHOLDER: &str = "Option";

/// Render the quiz rows, scrolled so the cursor stays visible.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let editing = match app.mode() {
        InputMode::Editing { .. } => true,
        InputMode::Navigate => false,
    };
    let lines = quiz_lines(
        app.block.store().questions(),
        app.block.view(),
        Some(app.cursor()),
        editing,
    );

    let height = area.height as usize;
    let scroll = if height == 0 {
        0
    } else {
        app.cursor().saturating_sub(height - 1)
    };

    let widget = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

/// One line per row of the projection.
pub fn quiz_lines(
    questions: &[Question],
    view: ViewMode,
    cursor: Option<usize>,
    editing: bool,
) -> Vec<Line<'static>> {
    crate::view::rows(questions, view)
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let focused = cursor == Some(index);
            let marker = if focused && view.is_editable() { "> " } else { "  " };
            let mut spans = vec![Span::styled(marker, Style::default().fg(Color::Cyan).bold())];
            spans.extend(row_spans(questions, view, row, focused, focused && editing));
            Line::from(spans)
        })
        .collect()
}

fn row_spans(
    questions: &[Question],
    view: ViewMode,
    row: Row,
    focused: bool,
    editing: bool,
) -> Vec<Span<'static>> {
    match row {
        Row::Question(q) => match questions.get(q) {
            Some(question) => question_spans(question, view, focused, editing),
            None => Vec::new(),
        },
        Row::Option { question, option } => match questions
            .get(question)
            .and_then(|q| q.options.get(option))
        {
            Some(opt) => option_spans(option, opt, view, focused, editing),
            None => Vec::new(),
        },
        Row::AddOption(_) => vec![
            Span::raw("    "),
            Span::styled("[+] option", highlight(Style::default().fg(Color::DarkGray), focused)),
        ],
        Row::AddQuestion => vec![Span::styled(
            "(+) Add Question",
            highlight(Style::default().fg(Color::Green), focused),
        )],
    }
}

fn question_spans(
    question: &Question,
    view: ViewMode,
    focused: bool,
    editing: bool,
) -> Vec<Span<'static>> {
    let style = Style::default().fg(Color::White).bold();

    if !view.is_editable() {
        return vec![Span::styled(question.question_text.clone(), style)];
    }

    vec![
        field(&question.question_text, QUESTION_PLACEHOLDER, style, focused, editing),
        Span::raw(" "),
        Span::styled("[-]", Style::default().fg(Color::DarkGray)),
    ]
}

fn option_spans(
    index: usize,
    option: &QuizOption,
    view: ViewMode,
    focused: bool,
    editing: bool,
) -> Vec<Span<'static>> {
    let label_style = Style::default().fg(Color::Black).bg(Color::Gray).bold();
    let text_style = Style::default().fg(Color::Gray);
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(format!(" {} ", option_label(index)), label_style),
        Span::raw(" "),
    ];

    if !view.is_editable() {
        spans.push(Span::styled(option.text.clone(), text_style));
        return spans;
    }

    spans.push(field(&option.text, OPTION_PLACEHOLDER, text_style, focused, editing));
    spans.push(Span::raw(" "));
    spans.push(if option.correct {
        Span::styled("[✓ Correct]", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled("[✗ Incorrect]", Style::default().fg(Color::Red))
    });
    spans.push(Span::raw(" "));
    spans.push(Span::styled("[-]", Style::default().fg(Color::DarkGray)));
    spans
}

/// An editable text field; empty fields show their placeholder.
fn field(
    text: &str,
    placeholder: &str,
    style: Style,
    focused: bool,
    editing: bool,
) -> Span<'static> {
    if editing {
        return Span::styled(
            format!("[{}_]", text),
            style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED),
        );
    }
    if text.is_empty() {
        return Span::styled(
            format!("[{}]", placeholder),
            highlight(Style::default().fg(Color::DarkGray).italic(), focused),
        );
    }
    Span::styled(format!("[{}]", text), highlight(style, focused))
}

fn highlight(style: Style, focused: bool) -> Style {
    if focused {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}
