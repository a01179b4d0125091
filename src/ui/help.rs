use crate::app::Tab;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;

fn section(title: &str) -> [Line<'_>; 2] {
    [
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Rgb(235, 203, 139))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ]
}

fn binding<'a>(keys: &'a str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<14}", keys), Style::default().fg(Color::Rgb(136, 192, 208))),
        Span::styled(description, Style::default().fg(Color::Rgb(216, 222, 233))),
    ])
}

fn global_help() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    lines.extend(section("Global"));
    lines.extend([
        binding("F1 F2 F3", "Tasks / Topics / Notes"),
        binding("[ ]", "Previous / next tab"),
        binding("?", "Toggle this help"),
        binding("Ctrl+Q", "Quit"),
    ]);
    lines.push(Line::from(""));
    lines.extend(section("Notes"));
    lines.extend([
        binding("Ctrl+P", "Editor / split / preview"),
        binding("Esc", "Leave the editor"),
        binding("i, Enter", "Back to the editor"),
        binding("j/k", "Scroll the preview"),
    ]);
    lines
}

fn tasks_help() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    lines.extend(section("Tasks"));
    lines.extend([
        binding("h/l, ←/→", "Previous / next column"),
        binding("j/k, ↓/↑", "Next / previous task"),
        binding("H/L, S-←/→", "Move task to column"),
        binding("n", "New task"),
        binding("e, Enter", "Edit task"),
        binding("d", "Delete task"),
        binding("y", "Copy description"),
        binding("q", "Quit"),
    ]);
    lines.push(Line::from(""));
    lines.extend(section("Task form"));
    lines.extend([
        binding("Tab/S-Tab", "Next / previous field"),
        binding("←/→", "Change priority"),
        binding("+/-, ↑/↓", "Date ±1 day"),
        binding("Ctrl+D", "Clear date"),
        binding("Enter, Ctrl+S", "Save"),
        binding("Esc", "Cancel"),
    ]);
    lines
}

fn topics_help() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    lines.extend(section("Topics"));
    lines.extend([
        binding("j/k, ↓/↑", "Next / previous topic"),
        binding("n", "New topic"),
        binding("i, Enter", "Edit in the form"),
        binding("d", "Delete topic"),
        binding("Ctrl+S", "Save changes"),
        binding("Ctrl+R", "Discard changes"),
    ]);
    lines.push(Line::from(""));
    lines.extend(section("Topic form"));
    lines.extend([
        binding("Tab/S-Tab", "Next / previous field"),
        binding("←/→, Space", "Change option"),
        binding("Esc", "Back to the table"),
    ]);
    lines
}

/// Key binding overlay; the active tab's column is highlighted.
pub fn render(f: &mut Frame, area: Rect, active: Tab) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Key bindings (Esc or ? to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(136, 192, 208)))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64)));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(inner);

    let panels = [
        (tasks_help(), active == Tab::Tasks),
        (topics_help(), active == Tab::Topics),
        (global_help(), active == Tab::Notes),
    ];
    for (i, (lines, highlighted)) in panels.into_iter().enumerate() {
        let border = if highlighted {
            Color::Rgb(136, 192, 208)
        } else {
            Color::Rgb(59, 66, 82)
        };
        let p = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(p, columns[i]);
    }
}
