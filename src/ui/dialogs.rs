use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;

/// What a confirmed dialog does.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    DeleteTask,
    DiscardTaskForm,
    DeleteTopic(i64),
    DiscardTopicChanges,
}

pub enum DialogType {
    /// Yes/no question
    Confirm {
        title: String,
        message: String,
        yes_selected: bool,
        action: ConfirmAction,
    },
    /// Message closed with any key
    Info { title: String, lines: Vec<String> },
}

impl DialogType {
    /// A confirmation that defaults to "No".
    pub fn confirm(title: &str, message: &str, action: ConfirmAction) -> Self {
        DialogType::Confirm {
            title: title.to_string(),
            message: message.to_string(),
            yes_selected: false,
            action,
        }
    }

    /// First-run message pointing at the data and settings locations.
    pub fn welcome(data_folder: &str, settings_path: &str) -> Self {
        DialogType::Info {
            title: "Welcome to tuido".to_string(),
            lines: vec![
                "Tasks, topics and notes are stored in:".to_string(),
                format!("  {}", data_folder),
                String::new(),
                "Settings file:".to_string(),
                format!("  {}", settings_path),
                String::new(),
                "F1 tasks   F2 topics   F3 notes   ? help   Ctrl+Q quit".to_string(),
            ],
        }
    }
}

pub fn render_dialog(f: &mut Frame, dialog: &DialogType) {
    let area = match dialog {
        DialogType::Confirm { .. } => centered_rect(50, 30, f.area()),
        DialogType::Info { .. } => centered_rect(70, 50, f.area()),
    };
    f.render_widget(Clear, area);

    match dialog {
        DialogType::Confirm {
            title,
            message,
            yes_selected,
            ..
        } => render_confirm_dialog(f, area, title, message, *yes_selected),
        DialogType::Info { title, lines } => render_info_dialog(f, area, title, lines),
    }
}

fn render_confirm_dialog(f: &mut Frame, area: Rect, title: &str, message: &str, yes_selected: bool) {
    let block = Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(235, 203, 139)))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let message_text = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Rgb(216, 222, 233)));
    f.render_widget(message_text, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    let no_style = if !yes_selected {
        Style::default()
            .bg(Color::Rgb(191, 97, 106))
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(191, 97, 106))
            .add_modifier(Modifier::DIM)
    };
    let no_button = Paragraph::new("[ n ] No").style(no_style).alignment(Alignment::Center);
    f.render_widget(no_button, button_chunks[1]);

    let yes_style = if yes_selected {
        Style::default()
            .bg(Color::Rgb(163, 190, 140))
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(163, 190, 140))
            .add_modifier(Modifier::DIM)
    };
    let yes_button = Paragraph::new("[ y ] Yes").style(yes_style).alignment(Alignment::Center);
    f.render_widget(yes_button, button_chunks[2]);
}

fn render_info_dialog(f: &mut Frame, area: Rect, title: &str, lines: &[String]) {
    let block = Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(136, 192, 208)))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let mut text: Vec<Line> = vec![Line::from("")];
    text.extend(lines.iter().map(|l| Line::from(l.as_str())));
    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Rgb(216, 222, 233)));
    f.render_widget(body, chunks[0]);

    let hint = Paragraph::new("Press any key to continue")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Rgb(129, 161, 193)));
    f.render_widget(hint, chunks[1]);
}
