use crate::app::{App, NotesView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Heading1,
    Heading2,
    Heading3,
    OpenTask,
    DoneTask,
    ListItem,
    Quote,
    Fence,
    Code,
    Text,
}

impl LineKind {
    fn style(self) -> Style {
        match self {
            LineKind::Heading1 => Style::default()
                .fg(Color::Rgb(235, 203, 139))
                .add_modifier(Modifier::BOLD),
            LineKind::Heading2 => Style::default()
                .fg(Color::Rgb(136, 192, 208))
                .add_modifier(Modifier::BOLD),
            LineKind::Heading3 => Style::default()
                .fg(Color::Rgb(129, 161, 193))
                .add_modifier(Modifier::BOLD),
            LineKind::OpenTask => Style::default().fg(Color::Rgb(136, 192, 208)),
            LineKind::DoneTask => Style::default()
                .fg(Color::Rgb(163, 190, 140))
                .add_modifier(Modifier::CROSSED_OUT),
            LineKind::ListItem => Style::default().fg(Color::Rgb(163, 190, 140)),
            LineKind::Quote => Style::default()
                .fg(Color::Rgb(180, 142, 173))
                .add_modifier(Modifier::ITALIC),
            LineKind::Fence => Style::default().fg(Color::Rgb(208, 135, 112)),
            LineKind::Code => Style::default()
                .fg(Color::Rgb(216, 222, 233))
                .add_modifier(Modifier::DIM),
            LineKind::Text => Style::default().fg(Color::Rgb(216, 222, 233)),
        }
    }
}

/// Markdown block type of a line, judged by its prefix.
fn classify(line: &str, in_fence: bool) -> LineKind {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        return LineKind::Fence;
    }
    if in_fence {
        return LineKind::Code;
    }
    if trimmed.starts_with("# ") {
        LineKind::Heading1
    } else if trimmed.starts_with("## ") {
        LineKind::Heading2
    } else if trimmed.starts_with("### ") || trimmed.starts_with("#### ") {
        LineKind::Heading3
    } else if trimmed.starts_with("- [ ]") || trimmed.starts_with("* [ ]") {
        LineKind::OpenTask
    } else if trimmed.starts_with("- [x]") || trimmed.starts_with("* [x]") || trimmed.starts_with("- [X]") {
        LineKind::DoneTask
    } else if trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ") {
        LineKind::ListItem
    } else if trimmed.starts_with('>') {
        LineKind::Quote
    } else if line.starts_with("    ") || line.starts_with('\t') {
        LineKind::Code
    } else {
        LineKind::Text
    }
}

fn highlight(text: &str) -> Vec<Line<'_>> {
    let mut in_fence = false;
    text.lines()
        .map(|line| {
            let kind = classify(line, in_fence);
            if kind == LineKind::Fence {
                in_fence = !in_fence;
            }
            Line::from(Span::styled(line, kind.style()))
        })
        .collect()
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    match app.notes_view {
        NotesView::Editor => render_editor(f, area, app),
        NotesView::Preview => render_preview(f, area, app),
        NotesView::Split => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            render_editor(f, chunks[0], app);
            render_preview(f, chunks[1], app);
        }
    }
}

fn render_editor(f: &mut Frame, area: Rect, app: &App) {
    let border = if app.notes_editing {
        Color::Rgb(136, 192, 208)
    } else {
        Color::Rgb(76, 86, 106)
    };
    let title = if app.notes.is_dirty() {
        " Notes * "
    } else {
        " Notes "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(ratatui::widgets::BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(&app.notes_editor, inner);
}

fn render_preview(f: &mut Frame, area: Rect, app: &App) {
    let border = if app.notes_editing {
        Color::Rgb(76, 86, 106)
    } else {
        Color::Rgb(136, 192, 208)
    };
    let paragraph = Paragraph::new(highlight(app.notes.text()))
        .block(
            Block::default()
                .title(" Preview ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .border_type(ratatui::widgets::BorderType::Rounded),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.notes_scroll, 0));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prefixes() {
        assert_eq!(classify("# Title", false), LineKind::Heading1);
        assert_eq!(classify("## Sub", false), LineKind::Heading2);
        assert_eq!(classify("#### Deep", false), LineKind::Heading3);
        assert_eq!(classify("#hashtag", false), LineKind::Text);
        assert_eq!(classify("- [ ] open", false), LineKind::OpenTask);
        assert_eq!(classify("  - [x] done", false), LineKind::DoneTask);
        assert_eq!(classify("* item", false), LineKind::ListItem);
        assert_eq!(classify("> quote", false), LineKind::Quote);
        assert_eq!(classify("    let x = 1;", false), LineKind::Code);
        assert_eq!(classify("plain", false), LineKind::Text);
    }

    #[test]
    fn test_fenced_block_is_code() {
        let lines = highlight("```rust\n# not a heading\n```\n# heading");
        let styles: Vec<Style> = lines.iter().map(|l| l.spans[0].style).collect();
        assert_eq!(styles[0], LineKind::Fence.style());
        assert_eq!(styles[1], LineKind::Code.style());
        assert_eq!(styles[2], LineKind::Fence.style());
        assert_eq!(styles[3], LineKind::Heading1.style());
    }
}
