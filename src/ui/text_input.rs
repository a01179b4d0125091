use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Style};
use tui_textarea::{CursorMove, Input, Key, TextArea};

/// Convert a crossterm key event into a tui-textarea input.
///
/// tui-textarea is built against its own crossterm release, so the `From`
/// conversion it ships does not accept our `KeyEvent`.
pub fn to_input(key: KeyEvent) -> Input {
    let key_code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::F(n) => Key::F(n),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Esc => Key::Esc,
        _ => Key::Null,
    };

    Input {
        key: key_code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    }
}

fn styled(mut textarea: TextArea<'static>) -> TextArea<'static> {
    // Nord palette
    textarea.set_style(
        Style::default()
            .fg(Color::Rgb(236, 239, 244))
            .bg(Color::Rgb(46, 52, 64)),
    );
    textarea.set_cursor_style(
        Style::default()
            .bg(Color::Rgb(136, 192, 208))
            .fg(Color::Rgb(46, 52, 64)),
    );
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_style(Style::default().fg(Color::Rgb(76, 86, 106)));
    textarea
}

/// Single-line input with the cursor at the end.
pub fn single_line(value: &str, placeholder: &str) -> TextArea<'static> {
    let first_line = value.lines().next().unwrap_or_default().to_string();
    let mut textarea = styled(TextArea::new(vec![first_line]));
    if !placeholder.is_empty() {
        textarea.set_placeholder_text(placeholder.to_string());
    }
    textarea.move_cursor(CursorMove::End);
    textarea
}

/// Multi-line editor; the cursor starts at the top.
pub fn multi_line(value: &str) -> TextArea<'static> {
    let lines: Vec<String> = if value.is_empty() {
        vec![String::new()]
    } else {
        value.split('\n').map(str::to_string).collect()
    };
    styled(TextArea::new(lines))
}

pub fn value(textarea: &TextArea<'_>) -> String {
    textarea.lines().join("\n")
}

/// Feed a key to a single-line input. Enter and newline shortcuts are
/// swallowed. Returns true if the text changed.
pub fn input_single_line(textarea: &mut TextArea<'static>, key: KeyEvent) -> bool {
    let input = to_input(key);
    match input {
        Input { key: Key::Enter, .. } | Input { key: Key::Char('m'), ctrl: true, .. } => false,
        input => textarea.input(input),
    }
}

/// Feed a key to a multi-line editor. Returns true if the text changed.
pub fn input_multi_line(textarea: &mut TextArea<'static>, key: KeyEvent) -> bool {
    textarea.input(to_input(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_to_input_maps_modifiers() {
        let input = to_input(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(input.key, Key::Char('s'));
        assert!(input.ctrl);
        assert!(!input.alt);

        assert_eq!(to_input(key(KeyCode::Insert)).key, Key::Null);
    }

    #[test]
    fn test_single_line_ignores_enter() {
        let mut ta = single_line("abc", "");
        assert!(!input_single_line(&mut ta, key(KeyCode::Enter)));
        assert!(input_single_line(&mut ta, key(KeyCode::Char('d'))));
        assert_eq!(value(&ta), "abcd");
        assert_eq!(ta.lines().len(), 1);
    }

    #[test]
    fn test_single_line_keeps_first_line_only() {
        let ta = single_line("one\ntwo", "");
        assert_eq!(value(&ta), "one");
    }

    #[test]
    fn test_multi_line_round_trip() {
        let ta = multi_line("# Title\n\n- item\n");
        assert_eq!(value(&ta), "# Title\n\n- item\n");
        assert_eq!(value(&multi_line("")), "");
    }
}
