use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use super::text_input::{input_multi_line, input_single_line, multi_line, single_line, value};
use crate::config::{Config, FieldDefinition, FieldType};
use crate::dates;
use crate::models::{FieldValue, Topic};

enum FieldInput {
    Text(TextArea<'static>),
    Select {
        options: Vec<FieldValue>,
        /// `None` when the stored value is empty or not one of the options.
        selected: Option<usize>,
        /// Stored value that matched no option; kept until the user picks one.
        other: Option<FieldValue>,
    },
}

struct FormField {
    def: FieldDefinition,
    input: FieldInput,
    dirty: bool,
}

impl FormField {
    fn new(def: &FieldDefinition, current: Option<&FieldValue>) -> Self {
        let input = match def.field_type {
            FieldType::Select => {
                let selected = current.and_then(|v| def.options.iter().position(|o| o == v));
                let other = match (selected, current) {
                    (None, Some(v)) if !v.is_empty() => Some(v.clone()),
                    _ => None,
                };
                FieldInput::Select {
                    options: def.options.clone(),
                    selected,
                    other,
                }
            }
            _ => {
                let text = current.map(|v| v.to_string()).unwrap_or_default();
                let placeholder = if def.field_type == FieldType::Date { "YYYY-MM-DD" } else { "" };
                if def.lines > 1 {
                    FieldInput::Text(multi_line(&text))
                } else {
                    FieldInput::Text(single_line(&text, placeholder))
                }
            }
        };
        Self {
            def: def.clone(),
            input,
            dirty: false,
        }
    }

    fn display(&self) -> String {
        match &self.input {
            FieldInput::Text(ta) => value(ta),
            FieldInput::Select { options, selected, other } => match selected {
                Some(i) => options[*i].to_string(),
                None => other.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            },
        }
    }

    /// Typed value: numbers become integers or floats when they parse.
    fn value(&self) -> FieldValue {
        match &self.input {
            FieldInput::Select { options, selected, other } => match selected {
                Some(i) => options[*i].clone(),
                None => other.clone().unwrap_or_else(FieldValue::empty),
            },
            FieldInput::Text(ta) => {
                let text = value(ta);
                if self.def.field_type == FieldType::Number {
                    let trimmed = text.trim();
                    if let Ok(i) = trimmed.parse::<i64>() {
                        return FieldValue::Integer(i);
                    }
                    if let Ok(x) = trimmed.parse::<f64>() {
                        return FieldValue::Float(x);
                    }
                }
                FieldValue::Text(text)
            }
        }
    }
}

/// Edit form for the selected topic, laid out from the config field grid.
pub struct TopicForm {
    pub topic_id: Option<i64>,
    fields: Vec<FormField>,
    /// Field indices per form row.
    rows: Vec<Vec<usize>>,
    focus: Option<usize>,
    pub error: Option<String>,
}

impl TopicForm {
    pub fn new(config: &Config) -> Self {
        let mut form = Self {
            topic_id: None,
            fields: Vec::new(),
            rows: Vec::new(),
            focus: None,
            error: None,
        };
        for row in &config.fields {
            let mut indices = Vec::with_capacity(row.len());
            for def in row {
                indices.push(form.fields.len());
                form.fields.push(FormField::new(def, None));
            }
            form.rows.push(indices);
        }
        form
    }

    /// Fill the form from a topic (or clear it). Missing fields show empty.
    pub fn load(&mut self, topic: Option<&Topic>) {
        self.topic_id = topic.map(|t| t.id);
        self.error = None;
        for field in &mut self.fields {
            if field.def.name == "id" {
                let id = topic.map(|t| FieldValue::Integer(t.id));
                *field = FormField::new(&field.def, id.as_ref());
                continue;
            }
            let current = topic.and_then(|t| {
                let v = t.get(&field.def.name);
                if v.is_none() {
                    log::warn!("Topic {} has no field '{}'", t.id, field.def.name);
                }
                v
            });
            *field = FormField::new(&field.def, current);
        }
        if self.focus.is_some_and(|i| self.fields[i].def.read_only) {
            self.focus = self.first_editable();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(|f| f.dirty)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn focused_name(&self) -> Option<&str> {
        self.focus.map(|i| self.fields[i].def.name.as_str())
    }

    fn first_editable(&self) -> Option<usize> {
        self.fields.iter().position(|f| !f.def.read_only)
    }

    /// Enter the form; focuses the first editable field.
    pub fn focus_first(&mut self) -> bool {
        if self.focus.is_none() {
            self.focus = self.first_editable();
        }
        self.focus.is_some()
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    pub fn is_focused(&self) -> bool {
        self.focus.is_some()
    }

    /// Step through editable fields, wrapping around.
    pub fn focus_step(&mut self, forward: bool) {
        let editable: Vec<usize> = (0..self.fields.len())
            .filter(|&i| !self.fields[i].def.read_only)
            .collect();
        if editable.is_empty() {
            return;
        }
        let pos = self
            .focus
            .and_then(|f| editable.iter().position(|&i| i == f))
            .unwrap_or(0);
        let n = editable.len();
        let next = if forward { (pos + 1) % n } else { (pos + n - 1) % n };
        self.focus = Some(editable[next]);
    }

    /// Route a key to the focused field. Returns true if its value changed.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        let Some(i) = self.focus else {
            return false;
        };
        let field = &mut self.fields[i];
        if field.def.read_only {
            return false;
        }
        let changed = match &mut field.input {
            FieldInput::Text(ta) if field.def.lines > 1 => input_multi_line(ta, key),
            FieldInput::Text(ta) => input_single_line(ta, key),
            FieldInput::Select { options, selected, .. } => {
                if options.is_empty() {
                    false
                } else {
                    let n = options.len();
                    match key.code {
                        KeyCode::Right | KeyCode::Char(' ') => {
                            *selected = Some(selected.map_or(0, |s| (s + 1) % n));
                            true
                        }
                        KeyCode::Left => {
                            *selected = Some(selected.map_or(n - 1, |s| (s + n - 1) % n));
                            true
                        }
                        _ => false,
                    }
                }
            }
        };
        if changed {
            field.dirty = true;
            self.error = None;
        }
        changed
    }

    /// Write the edited form values into `topic`. Fields not in the form, and
    /// untouched fields the topic already has, keep their stored value.
    /// Date fields must be empty or valid; on failure `error` is set.
    pub fn apply_to(&mut self, topic: &mut Topic) -> bool {
        for field in &self.fields {
            if field.def.field_type == FieldType::Date
                && !field.def.read_only
                && !dates::is_valid_or_empty(&field.display())
            {
                self.error = Some(format!("{} must be YYYY-MM-DD or empty.", field.def.caption));
                return false;
            }
        }
        for field in &self.fields {
            if field.def.name == "id" || (!field.dirty && topic.get(&field.def.name).is_some()) {
                continue;
            }
            topic.set(&field.def.name, field.value());
        }
        true
    }

    #[cfg(test)]
    pub fn display(&self, name: &str) -> Option<String> {
        self.fields.iter().find(|f| f.def.name == name).map(|f| f.display())
    }

    #[cfg(test)]
    pub fn focus_field(&mut self, name: &str) {
        self.focus = self.fields.iter().position(|f| f.def.name == name);
    }
}

/// Render the form: one line of fields per config row.
pub fn render(f: &mut Frame, area: Rect, form: &TopicForm, active: bool) {
    let title = match (form.topic_id, form.is_dirty()) {
        (Some(id), true) => format!(" Topic #{} (modified) ", id),
        (Some(id), false) => format!(" Topic #{} ", id),
        (None, _) => " No topic selected ".to_string(),
    };
    let border = if active { Color::White } else { Color::DarkGray };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(ratatui::widgets::BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if form.topic_id.is_none() {
        let p = Paragraph::new("Press n to create a topic.").style(Style::default().fg(Color::Gray));
        f.render_widget(p, inner);
        return;
    }

    let mut constraints: Vec<Constraint> = form
        .rows
        .iter()
        .map(|row| {
            let lines = row
                .iter()
                .map(|&i| form.fields[i].def.lines)
                .max()
                .unwrap_or(1);
            Constraint::Length(lines + 2)
        })
        .collect();
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (r, row) in form.rows.iter().enumerate() {
        let widths: Vec<Constraint> = row
            .iter()
            .map(|&i| match form.fields[i].def.input_width {
                Some(w) => Constraint::Length(w + 2),
                None => Constraint::Min(10),
            })
            .collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_areas[r]);
        for (c, &i) in row.iter().enumerate() {
            render_field(f, cells[c], &form.fields[i], form.focus == Some(i));
        }
    }

    if let Some(error) = &form.error {
        let p = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Rgb(191, 97, 106)));
        f.render_widget(p, row_areas[form.rows.len()]);
    }
}

fn render_field(f: &mut Frame, area: Rect, field: &FormField, focused: bool) {
    let mut title = field.def.caption.clone();
    if field.dirty {
        title.push_str(" *");
    }
    let (border, title_style) = if focused {
        (Color::Rgb(136, 192, 208), Style::default().fg(Color::Rgb(136, 192, 208)).add_modifier(Modifier::BOLD))
    } else if field.def.read_only {
        (Color::Rgb(59, 66, 82), Style::default().fg(Color::Rgb(76, 86, 106)))
    } else {
        (Color::Rgb(76, 86, 106), Style::default().fg(Color::Rgb(129, 161, 193)))
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(ratatui::widgets::BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    match &field.input {
        FieldInput::Text(ta) if focused => f.render_widget(ta, inner),
        FieldInput::Select { options, selected, .. } if focused => {
            let spans: Vec<Span> = options
                .iter()
                .enumerate()
                .flat_map(|(i, o)| {
                    let style = if Some(i) == *selected {
                        Style::default().fg(Color::Rgb(46, 52, 64)).bg(Color::Rgb(136, 192, 208))
                    } else {
                        Style::default().fg(Color::Rgb(129, 161, 193))
                    };
                    [Span::styled(format!(" {} ", o), style), Span::raw(" ")]
                })
                .collect();
            f.render_widget(Paragraph::new(Line::from(spans)), inner);
        }
        _ => {
            let style = if field.def.read_only {
                Style::default().fg(Color::Rgb(129, 161, 193))
            } else {
                Style::default().fg(Color::Rgb(216, 222, 233))
            };
            let p = Paragraph::new(field.display()).style(style).wrap(Wrap { trim: false });
            f.render_widget(p, inner);
        }
    }
}
