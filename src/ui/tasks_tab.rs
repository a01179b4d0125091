use crate::app::App;
use crate::models::Task;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::priority_color;

/// How close a date is, for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateTone {
    Ahead,
    Due,
    Overdue,
}

impl DateTone {
    fn color(self) -> Color {
        match self {
            DateTone::Ahead => Color::Rgb(163, 190, 140),
            DateTone::Due => Color::Rgb(235, 203, 139),
            DateTone::Overdue => Color::Rgb(191, 97, 106),
        }
    }
}

/// "YYYY-MM-DD (x d)" for the start date. Overdue only when both dates
/// have passed.
fn start_label(task: &Task) -> Option<(String, DateTone)> {
    let days = task.days_to_start?;
    let tone = if days > 0 {
        DateTone::Ahead
    } else if days < 0 && task.days_to_end.is_some_and(|end| end < 0) {
        DateTone::Overdue
    } else {
        DateTone::Due
    };
    Some((format!("{} ({} d)", task.start_date, days), tone))
}

fn end_label(task: &Task) -> Option<(String, DateTone)> {
    let days = task.days_to_end?;
    let tone = match days {
        d if d > 0 => DateTone::Ahead,
        0 => DateTone::Due,
        _ => DateTone::Overdue,
    };
    Some((format!("{} ({} d)", task.end_date, days), tone))
}

/// One list item per task: description, then the dates if set.
fn task_item(task: &Task, width: u16) -> ListItem<'static> {
    let mut lines = vec![Line::from(Span::styled(
        task.description.clone(),
        Style::default()
            .fg(priority_color(task.priority))
            .add_modifier(Modifier::BOLD),
    ))];

    let start = start_label(task);
    let end = end_label(task);
    if let Some((text, tone)) = start {
        lines.push(Line::from(Span::styled(format!("▶ {}", text), Style::default().fg(tone.color()))));
    }
    if let Some((text, tone)) = end {
        lines.push(Line::from(Span::styled(format!("◼ {}", text), Style::default().fg(tone.color()))));
    }
    lines.push(Line::from("─".repeat(width as usize)).style(Style::default().fg(Color::Rgb(59, 66, 82))));
    ListItem::new(lines)
}

/// Kanban board: one column per configured task column
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let columns = app.tasks.tasks_by_column();
    if columns.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (name, tasks)) in columns.iter().enumerate() {
        let caption = app.config.column_caption(name);
        render_column(f, areas[i], caption, tasks, i == app.selected_column, app.selected_task);
    }
}

fn render_column(f: &mut Frame, area: Rect, caption: &str, tasks: &[Task], focused: bool, selected: usize) {
    let (border_color, title_style) = if focused {
        (
            Color::Rgb(136, 192, 208),
            Style::default().fg(Color::Rgb(136, 192, 208)).add_modifier(Modifier::BOLD),
        )
    } else {
        (Color::Rgb(76, 86, 106), Style::default().fg(Color::Rgb(129, 161, 193)))
    };

    let block = Block::default()
        .title(format!(" {} ({}) ", caption, tasks.len()))
        .title_alignment(Alignment::Center)
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .border_type(ratatui::widgets::BorderType::Rounded);

    if tasks.is_empty() {
        let empty = Paragraph::new("No tasks")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Rgb(76, 86, 106)))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4);
    let items: Vec<ListItem> = tasks.iter().map(|t| task_item(t, width)).collect();
    let highlight = if focused {
        Style::default().bg(Color::Rgb(67, 76, 94))
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol(if focused { "▌" } else { " " });

    let mut state = ListState::default();
    state.select(Some(selected.min(tasks.len() - 1)));
    f.render_stateful_widget(list, area, &mut state);
}
