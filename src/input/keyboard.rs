use crate::app::{App, Mode, NotesView, Tab};
use crate::dates;
use crate::input::Command;
use crate::ui::dialogs::{ConfirmAction, DialogType};
use crate::ui::task_form::TaskFormField;
use crate::ui::text_input::value;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Handle a key press.
/// Returns false when the app should exit.
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return true;
    }
    if is_ctrl(key, 'q') {
        return false;
    }

    if app.dialog.is_some() {
        handle_dialog_mode(app, key);
        return true;
    }
    if app.mode == Mode::Help {
        handle_help_mode(app, key);
        return true;
    }
    if app.task_form.is_some() {
        handle_task_form(app, key);
        return true;
    }

    if let Some(tab) = function_key_tab(key) {
        execute_command(app, Command::SwitchTab(tab));
        return true;
    }

    if app.tab == Tab::Topics && app.topic_form.is_focused() {
        handle_topic_form(app, key);
        return true;
    }
    if app.tab == Tab::Notes && app.is_typing() {
        handle_notes_editor(app, key);
        return true;
    }

    match match_key(app.tab, key) {
        Some(Command::Quit) => false,
        Some(cmd) => {
            execute_command(app, cmd);
            true
        }
        None => true,
    }
}

fn is_ctrl(key: KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

fn function_key_tab(key: KeyEvent) -> Option<Tab> {
    match key.code {
        KeyCode::F(1) => Some(Tab::Tasks),
        KeyCode::F(2) => Some(Tab::Topics),
        KeyCode::F(3) => Some(Tab::Notes),
        _ => None,
    }
}

/// Map a key to a command on the given tab, outside text inputs.
pub fn match_key(tab: Tab, key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    // Shared by every tab
    match key.code {
        KeyCode::Char('?') => return Some(Command::ShowHelp),
        KeyCode::Char('[') => return Some(Command::PrevTab),
        KeyCode::Char(']') => return Some(Command::NextTab),
        _ => {}
    }

    match tab {
        Tab::Tasks => match key.code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('H') => Some(Command::MoveTaskLeft),
            KeyCode::Char('L') => Some(Command::MoveTaskRight),
            KeyCode::Left if shift => Some(Command::MoveTaskLeft),
            KeyCode::Right if shift => Some(Command::MoveTaskRight),
            KeyCode::Char('h') | KeyCode::Left => Some(Command::ColumnLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Command::ColumnRight),
            KeyCode::Char('j') | KeyCode::Down => Some(Command::TaskDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Command::TaskUp),
            KeyCode::Char('n') => Some(Command::NewTask),
            KeyCode::Char('e') | KeyCode::Enter => Some(Command::EditTask),
            KeyCode::Char('d') | KeyCode::Delete => Some(Command::DeleteTask),
            KeyCode::Char('y') => Some(Command::CopyTask),
            _ => None,
        },
        Tab::Topics => match key.code {
            KeyCode::Char('s') if ctrl => Some(Command::SaveTopic),
            KeyCode::Char('r') if ctrl => Some(Command::DiscardTopic),
            KeyCode::Char('j') | KeyCode::Down => Some(Command::TopicDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Command::TopicUp),
            KeyCode::Char('n') => Some(Command::NewTopic),
            KeyCode::Char('i') | KeyCode::Enter => Some(Command::EditTopic),
            KeyCode::Char('d') | KeyCode::Delete => Some(Command::DeleteTopic),
            _ => None,
        },
        Tab::Notes => match key.code {
            KeyCode::Char('p') if ctrl => Some(Command::CycleNotesView),
            KeyCode::Char('i') | KeyCode::Enter => Some(Command::EditNotes),
            KeyCode::Char('j') | KeyCode::Down => Some(Command::ScrollNotesDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Command::ScrollNotesUp),
            _ => None,
        },
    }
}

fn execute_command(app: &mut App, cmd: Command) {
    match cmd {
        Command::Quit => {}
        Command::ShowHelp => app.mode = Mode::Help,
        Command::SwitchTab(tab) => app.switch_tab(tab),
        Command::NextTab => app.switch_tab(app.tab.next()),
        Command::PrevTab => app.switch_tab(app.tab.prev()),

        Command::TaskUp => app.select_task(false),
        Command::TaskDown => app.select_task(true),
        Command::ColumnLeft => app.select_column(false),
        Command::ColumnRight => app.select_column(true),
        Command::MoveTaskLeft => app.move_task(false),
        Command::MoveTaskRight => app.move_task(true),
        Command::NewTask => app.open_new_task_form(),
        Command::EditTask => app.open_edit_task_form(),
        Command::DeleteTask => app.request_delete_task(),
        Command::CopyTask => app.copy_selected_task(),

        Command::TopicUp => app.select_topic(false),
        Command::TopicDown => app.select_topic(true),
        Command::NewTopic => app.new_topic(),
        Command::EditTopic => app.edit_topic(),
        Command::DeleteTopic => app.request_delete_topic(),
        Command::SaveTopic => app.save_topic(),
        Command::DiscardTopic => app.request_discard_topic(),

        Command::CycleNotesView => app.cycle_notes_view(),
        Command::EditNotes => {
            if app.notes_view == NotesView::Preview {
                app.notes_view = NotesView::Split;
            }
            app.notes_editing = true;
        }
        Command::ScrollNotesUp => app.scroll_notes(false),
        Command::ScrollNotesDown => app.scroll_notes(true),
    }
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent) {
    let Some(dialog) = app.dialog.as_mut() else {
        return;
    };
    match dialog {
        DialogType::Info { .. } => app.dialog = None,
        DialogType::Confirm {
            yes_selected,
            action,
            ..
        } => {
            let confirmed = match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
                KeyCode::Enter => Some(*yes_selected),
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Char('l') => {
                    *yes_selected = !*yes_selected;
                    None
                }
                _ => None,
            };
            if let Some(confirmed) = confirmed {
                let action = action.clone();
                app.dialog = None;
                if confirmed {
                    execute_confirm(app, action);
                }
            }
        }
    }
}

fn execute_confirm(app: &mut App, action: ConfirmAction) {
    log::debug!("Confirmed {:?}", action);
    match action {
        ConfirmAction::DeleteTask => app.delete_selected_task(),
        ConfirmAction::DiscardTaskForm => app.task_form = None,
        ConfirmAction::DeleteTopic(id) => app.delete_topic(id),
        ConfirmAction::DiscardTopicChanges => app.discard_topic_changes(),
    }
}

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter) {
        app.mode = Mode::Normal;
    }
}

fn handle_task_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.task_form.as_mut() else {
        return;
    };

    if is_ctrl(key, 's') {
        app.submit_task_form();
        return;
    }
    if is_ctrl(key, 'd') {
        form.clear_date();
        return;
    }

    match key.code {
        KeyCode::Esc => app.request_close_task_form(),
        KeyCode::Enter => app.submit_task_form(),
        KeyCode::Tab => form.focus_next(),
        KeyCode::BackTab => form.focus_prev(),
        KeyCode::Left | KeyCode::Char('h') if form.focus == TaskFormField::Priority => form.cycle_priority(false),
        KeyCode::Right | KeyCode::Char('l') if form.focus == TaskFormField::Priority => form.cycle_priority(true),
        KeyCode::Up | KeyCode::Down | KeyCode::Char('+') | KeyCode::Char('-') if date_shift_applies(form, key) => {
            let days = match key.code {
                KeyCode::Up | KeyCode::Char('+') => 1,
                _ => -1,
            };
            app.shift_task_form_date(days);
        }
        _ => {
            form.input(key);
        }
    }
}

/// `+`/`-` shift a date only while the field is empty or holds a full
/// date, so a date can still be typed by hand.
fn date_shift_applies(form: &crate::ui::task_form::TaskForm, key: KeyEvent) -> bool {
    let text = match form.focus {
        TaskFormField::StartDate => value(&form.start_date),
        TaskFormField::EndDate => value(&form.end_date),
        _ => return false,
    };
    match key.code {
        KeyCode::Up | KeyCode::Down => true,
        _ => text.trim().is_empty() || dates::parse(&text).is_some(),
    }
}

fn handle_topic_form(app: &mut App, key: KeyEvent) {
    if is_ctrl(key, 's') {
        app.save_topic();
        return;
    }
    if is_ctrl(key, 'r') {
        app.request_discard_topic();
        return;
    }
    match key.code {
        KeyCode::Esc => app.topic_form.blur(),
        KeyCode::Tab => app.topic_form.focus_step(true),
        KeyCode::BackTab => app.topic_form.focus_step(false),
        _ => {
            app.topic_form.input(key);
        }
    }
}

fn handle_notes_editor(app: &mut App, key: KeyEvent) {
    if is_ctrl(key, 'p') {
        app.cycle_notes_view();
        return;
    }
    match key.code {
        KeyCode::Esc => app.notes_editing = false,
        _ => app.notes_input(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskRecord;
    use crate::test_support::test_app;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        handle_key_input(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn record(description: &str) -> TaskRecord {
        TaskRecord {
            description: description.to_string(),
            priority: 2,
            start_date: String::new(),
            end_date: String::new(),
        }
    }

    #[test]
    fn test_match_key_per_tab() {
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(match_key(Tab::Tasks, key('n')), Some(Command::NewTask));
        assert_eq!(match_key(Tab::Topics, key('n')), Some(Command::NewTopic));
        assert_eq!(match_key(Tab::Notes, key('n')), None);
        assert_eq!(match_key(Tab::Tasks, key('q')), Some(Command::Quit));
        assert_eq!(match_key(Tab::Topics, key('q')), None);
        assert_eq!(
            match_key(Tab::Tasks, KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT)),
            Some(Command::MoveTaskLeft)
        );
        assert_eq!(match_key(Tab::Tasks, KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)), Some(Command::ColumnLeft));
        assert_eq!(match_key(Tab::Notes, key(']')), Some(Command::NextTab));
    }

    #[test]
    fn test_quit_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        assert!(!ctrl(&mut app, 'q'));
        assert!(!press(&mut app, KeyCode::Char('q')));

        app.switch_tab(Tab::Notes);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.notes.text(), "q");
    }

    #[test]
    fn test_function_keys_switch_tabs() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        press(&mut app, KeyCode::F(3));
        assert_eq!(app.tab, Tab::Notes);
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.tab, Tab::Topics);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.tab, Tab::Tasks);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        app.tasks.add_task("todo", record("keep me"));

        press(&mut app, KeyCode::Char('d'));
        assert!(app.dialog.is_some());
        press(&mut app, KeyCode::Char('n'));
        assert!(app.dialog.is_none());
        assert_eq!(app.tasks.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.tasks.len(), 0);
    }

    #[test]
    fn test_confirm_enter_uses_selected_button() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        app.tasks.add_task("todo", record("x"));

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tasks.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tasks.len(), 0);
    }

    #[test]
    fn test_task_form_flow() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        press(&mut app, KeyCode::Char('n'));
        assert!(app.task_form.is_some());

        for c in "Write report".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Enter);

        assert!(app.task_form.is_none());
        let task = &app.tasks.tasks("todo")[0];
        assert_eq!(task.description, "Write report");
        assert_eq!(task.priority.label(), "Low");
        // an empty date jumps to today
        assert_eq!(task.start_date, dates::format(dates::today()));
    }

    #[test]
    fn test_minus_types_into_partial_date() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        for c in "2025-03-04".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(value(&app.task_form.as_ref().unwrap().start_date), "2025-03-04");

        press(&mut app, KeyCode::Char('-'));
        assert_eq!(value(&app.task_form.as_ref().unwrap().start_date), "2025-03-03");
    }

    #[test]
    fn test_escape_on_modified_form_asks() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);
        assert!(app.dialog.is_some());
        press(&mut app, KeyCode::Char('y'));
        assert!(app.task_form.is_none());
        assert_eq!(app.tasks.len(), 0);
    }

    #[test]
    fn test_topic_form_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        app.switch_tab(Tab::Topics);
        press(&mut app, KeyCode::Char('n'));
        assert!(app.topic_form.is_focused());

        // 'q' and 'n' are text while the form has focus
        for c in "qn".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(ctrl(&mut app, 's'));
        assert_eq!(app.topics.by_id(1).unwrap().text("title"), "qn");

        press(&mut app, KeyCode::Esc);
        assert!(!app.topic_form.is_focused());
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.topics.len(), 2);
    }

    #[test]
    fn test_notes_escape_then_scroll_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        press(&mut app, KeyCode::F(3));
        assert!(app.is_typing());
        press(&mut app, KeyCode::Esc);
        assert!(!app.is_typing());
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.notes_scroll, 1);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
        press(&mut app, KeyCode::Char('i'));
        assert!(app.is_typing());
    }
}
