use crate::app::{App, Tab};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn hints(app: &App) -> &'static str {
    if app.task_form.is_some() {
        return "Tab field  ←/→ priority  +/- date  Enter save  Esc cancel";
    }
    match app.tab {
        Tab::Tasks => "h/l column  j/k task  H/L move  n new  e edit  d delete  y copy  ? help",
        Tab::Topics if app.topic_form.is_focused() => "Tab field  Ctrl+S save  Ctrl+R discard  Esc table",
        Tab::Topics => "j/k topic  n new  Enter edit  d delete  Ctrl+S save  ? help",
        Tab::Notes if app.is_typing() => "Ctrl+P view  Esc leave editor",
        Tab::Notes => "i edit  j/k scroll  Ctrl+P view  ? help",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let (label, color) = match app.tab {
        Tab::Tasks => ("TASKS", Color::Rgb(163, 190, 140)),
        Tab::Topics => ("TOPICS", Color::Rgb(180, 142, 173)),
        Tab::Notes => ("NOTES", Color::Rgb(208, 135, 112)),
    };

    let detail = match app.tab {
        Tab::Tasks => format!(" {} tasks ", app.tasks.len()),
        Tab::Topics => format!(" {} topics ", app.topics.len()),
        Tab::Notes => {
            let state = if app.notes.is_dirty() { "modified" } else { "saved" };
            format!(" {} | {} ", app.notes_view.label(), state)
        }
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", label),
            Style::default()
                .fg(Color::Rgb(46, 52, 64))
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(detail, Style::default().fg(Color::Rgb(216, 222, 233))),
        Span::styled(
            format!("| {}", hints(app)),
            Style::default().fg(Color::Rgb(129, 161, 193)),
        ),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Rgb(59, 66, 82)));
    f.render_widget(paragraph, area);
}
