use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use super::text_input::{input_single_line, single_line, value};
use crate::dates;
use crate::models::{Priority, Task, TaskRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormField {
    Description,
    Priority,
    StartDate,
    EndDate,
}

impl TaskFormField {
    const ORDER: [TaskFormField; 4] = [
        TaskFormField::Description,
        TaskFormField::Priority,
        TaskFormField::StartDate,
        TaskFormField::EndDate,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// What submitting the form does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFormTarget {
    New,
    /// Replace the task at `index` in `column`.
    Edit { column: String, index: usize },
}

pub struct TaskForm {
    pub target: TaskFormTarget,
    pub description: TextArea<'static>,
    pub priority: Priority,
    pub start_date: TextArea<'static>,
    pub end_date: TextArea<'static>,
    pub focus: TaskFormField,
    pub error: Option<String>,
    initial: TaskRecord,
}

impl TaskForm {
    pub fn new_task() -> Self {
        Self::build(
            TaskFormTarget::New,
            TaskRecord {
                description: String::new(),
                priority: Priority::Unset.number(),
                start_date: String::new(),
                end_date: String::new(),
            },
        )
    }

    pub fn edit_task(task: &Task, index: usize) -> Self {
        Self::build(
            TaskFormTarget::Edit {
                column: task.column.clone(),
                index,
            },
            task.to_record(),
        )
    }

    fn build(target: TaskFormTarget, initial: TaskRecord) -> Self {
        Self {
            target,
            description: single_line(&initial.description, "What needs to be done?"),
            priority: Priority::from_number(initial.priority as i64),
            start_date: single_line(&initial.start_date, "YYYY-MM-DD"),
            end_date: single_line(&initial.end_date, "YYYY-MM-DD"),
            focus: TaskFormField::Description,
            error: None,
            initial,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.target {
            TaskFormTarget::New => "New task",
            TaskFormTarget::Edit { .. } => "Edit task",
        }
    }

    /// Current values, trimmed.
    pub fn record(&self) -> TaskRecord {
        TaskRecord {
            description: value(&self.description).trim().to_string(),
            priority: self.priority.number(),
            start_date: value(&self.start_date).trim().to_string(),
            end_date: value(&self.end_date).trim().to_string(),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.record() != self.initial
    }

    pub fn focus_next(&mut self) {
        let i = (self.focus.index() + 1) % TaskFormField::ORDER.len();
        self.focus = TaskFormField::ORDER[i];
    }

    pub fn focus_prev(&mut self) {
        let n = TaskFormField::ORDER.len();
        let i = (self.focus.index() + n - 1) % n;
        self.focus = TaskFormField::ORDER[i];
    }

    /// Route a key to the focused text field.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        let changed = match self.focus {
            TaskFormField::Description => input_single_line(&mut self.description, key),
            TaskFormField::StartDate => input_single_line(&mut self.start_date, key),
            TaskFormField::EndDate => input_single_line(&mut self.end_date, key),
            TaskFormField::Priority => false,
        };
        if changed {
            self.error = None;
        }
        changed
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        self.priority = if forward {
            self.priority.next()
        } else {
            self.priority.prev()
        };
    }

    fn date_field(&mut self, field: TaskFormField) -> Option<&mut TextArea<'static>> {
        match field {
            TaskFormField::StartDate => Some(&mut self.start_date),
            TaskFormField::EndDate => Some(&mut self.end_date),
            _ => None,
        }
    }

    /// Move the focused date by `days` (an empty date becomes `today`), then
    /// keep start <= end: lowering the end date pulls the start date along,
    /// every other change pushes the end date.
    pub fn shift_date(&mut self, days: i64, today: NaiveDate) {
        let field = self.focus;
        let Some(input) = self.date_field(field) else {
            return;
        };
        let shifted = dates::shift(&value(input), days, today);
        *input = single_line(&shifted, "YYYY-MM-DD");
        self.error = None;

        let pull_start = field == TaskFormField::EndDate && days < 0;
        self.synchronize_dates(pull_start);
    }

    pub fn clear_date(&mut self) {
        let field = self.focus;
        if let Some(input) = self.date_field(field) {
            *input = single_line("", "YYYY-MM-DD");
            self.error = None;
        }
    }

    fn synchronize_dates(&mut self, pull_start: bool) {
        let start_text = value(&self.start_date);
        let end_text = value(&self.end_date);
        let (Some(start), Some(end)) = (dates::parse(&start_text), dates::parse(&end_text)) else {
            return;
        };
        if start > end {
            if pull_start {
                self.start_date = single_line(&end_text, "YYYY-MM-DD");
            } else {
                self.end_date = single_line(&start_text, "YYYY-MM-DD");
            }
        }
    }

    /// Validate and return the record to store; sets `error` on failure.
    pub fn validate(&mut self) -> Option<TaskRecord> {
        let record = self.record();
        let problem = if record.description.is_empty() {
            Some("Description must not be empty.")
        } else if !dates::is_valid_or_empty(&record.start_date) {
            Some("Start date must be YYYY-MM-DD or empty.")
        } else if !dates::is_valid_or_empty(&record.end_date) {
            Some("End date must be YYYY-MM-DD or empty.")
        } else {
            None
        };
        match problem {
            Some(msg) => {
                self.error = Some(msg.to_string());
                None
            }
            None => Some(record),
        }
    }
}

/// Render the task form as a centered popup.
pub fn render(f: &mut Frame, form: &TaskForm) {
    let area = super::centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!("  {}  ", form.title()))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(76, 86, 106)))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // description
            Constraint::Length(3), // priority
            Constraint::Length(3), // start date
            Constraint::Length(3), // end date
            Constraint::Length(1), // error
            Constraint::Min(0),
            Constraint::Length(2), // key hints
        ])
        .split(inner);

    render_text_field(f, chunks[0], "Description", &form.description, form.focus == TaskFormField::Description, "");
    render_priority(f, chunks[1], form.priority, form.focus == TaskFormField::Priority);
    render_text_field(
        f,
        chunks[2],
        "Start date",
        &form.start_date,
        form.focus == TaskFormField::StartDate,
        dates::weekday_name(&value(&form.start_date)),
    );
    render_text_field(
        f,
        chunks[3],
        "End date",
        &form.end_date,
        form.focus == TaskFormField::EndDate,
        dates::weekday_name(&value(&form.end_date)),
    );

    if let Some(error) = &form.error {
        let p = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Rgb(191, 97, 106)));
        f.render_widget(p, chunks[4]);
    }

    let hints = Paragraph::new(vec![
        Line::from("Tab/Shift+Tab field   ←/→ priority   +/- date ±1 day   Ctrl+D clear date"),
        Line::from("Enter or Ctrl+S save   Esc cancel"),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Rgb(129, 161, 193)));
    f.render_widget(hints, chunks[6]);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused {
        Color::Rgb(136, 192, 208)
    } else {
        Color::Rgb(76, 86, 106)
    };
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .border_type(ratatui::widgets::BorderType::Rounded)
}

fn render_text_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    textarea: &TextArea<'static>,
    focused: bool,
    suffix: &str,
) {
    let block = field_block(title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(if suffix.is_empty() { 0 } else { 12 })])
        .split(inner);

    if focused {
        f.render_widget(textarea, parts[0]);
    } else {
        let p = Paragraph::new(value(textarea)).style(Style::default().fg(Color::Rgb(216, 222, 233)));
        f.render_widget(p, parts[0]);
    }

    if !suffix.is_empty() {
        let label = Paragraph::new(suffix)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::Rgb(129, 161, 193)));
        f.render_widget(label, parts[1]);
    }
}

fn render_priority(f: &mut Frame, area: Rect, priority: Priority, focused: bool) {
    let block = field_block("Priority", focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = Vec::new();
    for p in Priority::ALL {
        let style = if p == priority {
            Style::default()
                .fg(Color::Rgb(46, 52, 64))
                .bg(super::priority_color(p))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(129, 161, 193))
        };
        spans.push(Span::styled(format!(" {} ", p.label()), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    fn type_text(form: &mut TaskForm, text: &str) {
        for c in text.chars() {
            form.input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn task(start: &str, end: &str) -> Task {
        Task::new("todo", "Pay rent", Priority::High, start, end)
    }

    #[test]
    fn test_new_form_is_unmodified_until_typed() {
        let mut form = TaskForm::new_task();
        assert!(!form.is_modified());
        type_text(&mut form, "Buy milk");
        assert!(form.is_modified());
        assert_eq!(form.record().description, "Buy milk");
        assert_eq!(form.record().priority, 4);
    }

    #[test]
    fn test_edit_form_prefills_values() {
        let form = TaskForm::edit_task(&task("2025-05-01", "2025-05-03"), 2);
        let record = form.record();
        assert_eq!(record.description, "Pay rent");
        assert_eq!(record.priority, 1);
        assert_eq!(record.start_date, "2025-05-01");
        assert_eq!(
            form.target,
            TaskFormTarget::Edit {
                column: "todo".to_string(),
                index: 2
            }
        );
        assert!(!form.is_modified());
    }

    #[test]
    fn test_shift_empty_date_sets_today() {
        let mut form = TaskForm::new_task();
        form.focus = TaskFormField::StartDate;
        form.shift_date(1, today());
        assert_eq!(form.record().start_date, "2025-05-10");
        form.shift_date(1, today());
        assert_eq!(form.record().start_date, "2025-05-11");
    }

    #[test]
    fn test_raising_start_pushes_end() {
        let mut form = TaskForm::edit_task(&task("2025-05-05", "2025-05-05"), 0);
        form.focus = TaskFormField::StartDate;
        form.shift_date(1, today());
        assert_eq!(form.record().start_date, "2025-05-06");
        assert_eq!(form.record().end_date, "2025-05-06");
    }

    #[test]
    fn test_lowering_end_pulls_start() {
        let mut form = TaskForm::edit_task(&task("2025-05-05", "2025-05-05"), 0);
        form.focus = TaskFormField::EndDate;
        form.shift_date(-1, today());
        assert_eq!(form.record().start_date, "2025-05-04");
        assert_eq!(form.record().end_date, "2025-05-04");
    }

    #[test]
    fn test_clear_date() {
        let mut form = TaskForm::edit_task(&task("2025-05-05", "2025-05-07"), 0);
        form.focus = TaskFormField::EndDate;
        form.clear_date();
        assert_eq!(form.record().end_date, "");
        assert_eq!(form.record().start_date, "2025-05-05");

        form.focus = TaskFormField::Description;
        form.clear_date();
        assert_eq!(form.record().description, "Pay rent");
    }

    #[test]
    fn test_validate() {
        let mut form = TaskForm::new_task();
        assert!(form.validate().is_none());
        assert!(form.error.is_some());

        type_text(&mut form, "Call Bob");
        assert!(form.error.is_none());
        form.focus = TaskFormField::StartDate;
        type_text(&mut form, "2025-13-01");
        assert!(form.validate().is_none());
        assert_eq!(form.error.as_deref(), Some("Start date must be YYYY-MM-DD or empty."));

        form.clear_date();
        let record = form.validate().unwrap();
        assert_eq!(record.description, "Call Bob");
        assert_eq!(record.start_date, "");
    }

    #[test]
    fn test_focus_cycles() {
        let mut form = TaskForm::new_task();
        form.focus_prev();
        assert_eq!(form.focus, TaskFormField::EndDate);
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, TaskFormField::Priority);
        form.cycle_priority(true);
        assert_eq!(form.priority, Priority::High);
        form.cycle_priority(false);
        assert_eq!(form.priority, Priority::Unset);
    }
}
