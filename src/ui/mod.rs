pub mod dialogs;
mod help;
mod notes_tab;
mod statusbar;
pub mod task_form;
mod tasks_tab;
pub mod text_input;
pub mod topic_form;
mod topics_tab;

use crate::app::{App, Mode, Notification, NotificationLevel, Tab};
use crate::models::Priority;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Main render function
pub fn render(f: &mut Frame, app: &App) {
    let background = Block::default().style(Style::default().bg(Color::Rgb(46, 52, 64)));
    f.render_widget(background, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Min(0),    // content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app.tab);
    match app.tab {
        Tab::Tasks => tasks_tab::render(f, chunks[1], app),
        Tab::Topics => topics_tab::render(f, chunks[1], app),
        Tab::Notes => notes_tab::render(f, chunks[1], app),
    }
    statusbar::render(f, chunks[2], app);

    if let Some(form) = &app.task_form {
        task_form::render(f, form);
    }
    if app.mode == Mode::Help {
        help::render(f, f.area(), app.tab);
    }
    if let Some(dialog) = &app.dialog {
        dialogs::render_dialog(f, dialog);
    }
    if let Some(notification) = &app.notification {
        render_notification(f, f.area(), notification);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, active: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" F{} {} ", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(active.index())
        .style(Style::default().fg(Color::Rgb(129, 161, 193)))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(46, 52, 64))
                .bg(Color::Rgb(136, 192, 208))
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    f.render_widget(tabs, area);
}

/// Notification bar over the top 3 rows
fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.min(3),
    };

    let (bg_color, fg_color, prefix) = match notification.level {
        NotificationLevel::Info => (Color::Rgb(94, 129, 172), Color::White, "ℹ"),
        NotificationLevel::Success => (Color::Rgb(163, 190, 140), Color::Rgb(46, 52, 64), "✓"),
        NotificationLevel::Warning => (Color::Rgb(235, 203, 139), Color::Rgb(46, 52, 64), "⚠"),
        NotificationLevel::Error => (Color::Rgb(191, 97, 106), Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default().fg(fg_color).bg(bg_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(&notification.message, Style::default().fg(fg_color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    f.render_widget(Paragraph::new(content).block(block), notification_area);
}

/// Centered rectangle taking a percentage of `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Rgb(191, 97, 106),
        Priority::Medium => Color::Rgb(235, 203, 139),
        Priority::Low => Color::Rgb(163, 190, 140),
        Priority::Unset => Color::Rgb(216, 222, 233),
    }
}
