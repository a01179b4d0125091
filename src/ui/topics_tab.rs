use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::topic_form;

/// Topics table on the left, edit form on the right
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_table(f, chunks[0], app);
    topic_form::render(f, chunks[1], &app.topic_form, app.topic_form.is_focused());
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let columns: Vec<_> = app.config.table_columns().filter(|c| c.name != "id").collect();

    let mut widths = vec![Constraint::Length(5)];
    widths.extend(columns.iter().map(|c| match c.table_column_width {
        w if w > 0 => Constraint::Length(w as u16),
        _ => Constraint::Min(8),
    }));

    let header_style = Style::default()
        .fg(Color::Rgb(136, 192, 208))
        .add_modifier(Modifier::BOLD);
    let id_caption = app.config.field("id").map(|d| d.caption.as_str()).unwrap_or("ID");
    let mut header_cells = vec![Cell::from(id_caption)];
    header_cells.extend(columns.iter().map(|c| Cell::from(c.caption.clone())));
    let header = Row::new(header_cells).style(header_style).bottom_margin(1);

    let rows: Vec<Row> = app
        .topic_ids_desc()
        .into_iter()
        .filter_map(|id| app.topics.by_id(id))
        .map(|topic| {
            let mut cells = vec![Cell::from(topic.id.to_string())];
            cells.extend(columns.iter().map(|c| Cell::from(topic.text(&c.name))));
            Row::new(cells).style(Style::default().fg(Color::Rgb(216, 222, 233)))
        })
        .collect();

    let focused = !app.topic_form.is_focused();
    let border = if focused {
        Color::Rgb(136, 192, 208)
    } else {
        Color::Rgb(76, 86, 106)
    };
    let title = if app.topic_form.is_dirty() {
        format!(" Topics ({}) - unsaved changes ", app.topics.len())
    } else {
        format!(" Topics ({}) ", app.topics.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .border_type(ratatui::widgets::BorderType::Rounded),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Rgb(67, 76, 94))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▌");

    let mut state = TableState::default();
    if !app.topics.is_empty() {
        state.select(Some(app.selected_topic));
    }
    f.render_stateful_widget(table, area, &mut state);
}
