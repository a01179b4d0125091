use crate::app::{App, NotificationLevel};
use crate::dates;
use crate::models::Task;
use crate::ui::dialogs::{ConfirmAction, DialogType};
use crate::ui::task_form::{TaskForm, TaskFormTarget};

impl App {
    pub fn column_count(&self) -> usize {
        self.tasks.tasks_by_column().len()
    }

    pub fn current_column_name(&self) -> Option<&str> {
        self.tasks
            .tasks_by_column()
            .get(self.selected_column)
            .map(|(name, _)| name.as_str())
    }

    fn current_column_tasks(&self) -> &[Task] {
        self.tasks
            .tasks_by_column()
            .get(self.selected_column)
            .map(|(_, tasks)| tasks.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_task_ref(&self) -> Option<&Task> {
        self.current_column_tasks().get(self.selected_task)
    }

    /// Keep the cursor inside the board after the board changed.
    pub fn clamp_task_selection(&mut self) {
        let columns = self.column_count();
        if columns == 0 {
            self.selected_column = 0;
        } else if self.selected_column >= columns {
            self.selected_column = columns - 1;
        }
        let len = self.current_column_tasks().len();
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
    }

    /// Move the cursor within the column, wrapping at both ends.
    pub fn select_task(&mut self, down: bool) {
        let len = self.current_column_tasks().len();
        if len == 0 {
            return;
        }
        self.selected_task = if down {
            (self.selected_task + 1) % len
        } else {
            (self.selected_task + len - 1) % len
        };
    }

    /// Focus the next column in the given direction that has tasks,
    /// wrapping around. Nothing happens when every column is empty.
    pub fn select_column(&mut self, right: bool) {
        let n = self.column_count();
        if n == 0 {
            return;
        }
        let columns = self.tasks.tasks_by_column();
        let mut index = self.selected_column;
        for _ in 0..n {
            index = if right { (index + 1) % n } else { (index + n - 1) % n };
            if !columns[index].1.is_empty() {
                self.selected_column = index;
                self.clamp_task_selection();
                return;
            }
        }
    }

    /// Transfer the selected task to the neighbouring column (no wraparound).
    pub fn move_task(&mut self, right: bool) {
        let n = self.column_count();
        if n == 0 {
            return;
        }
        let source = self.selected_column;
        let target = if right {
            (source + 1).min(n - 1)
        } else {
            source.saturating_sub(1)
        };
        if target == source || self.selected_task_ref().is_none() {
            return;
        }

        let columns = self.tasks.tasks_by_column();
        let source_name = columns[source].0.clone();
        let target_name = columns[target].0.clone();
        let Some(key) = self.tasks.transfer(&source_name, self.selected_task, &target_name) else {
            return;
        };
        log::debug!("Moved task {} from '{}' to '{}'", key, source_name, target_name);

        self.selected_column = target;
        self.selected_task = self.tasks.position_of(&target_name, key).unwrap_or(0);
        self.save_tasks();
    }

    pub fn open_new_task_form(&mut self) {
        self.task_form = Some(TaskForm::new_task());
    }

    pub fn open_edit_task_form(&mut self) {
        if let Some(task) = self.selected_task_ref() {
            self.task_form = Some(TaskForm::edit_task(task, self.selected_task));
        }
    }

    /// Validate the open form and apply it. The form stays open on errors.
    pub fn submit_task_form(&mut self) {
        let Some(form) = self.task_form.as_mut() else {
            return;
        };
        let Some(record) = form.validate() else {
            return;
        };
        let target = form.target.clone();
        self.task_form = None;

        let column = match target {
            TaskFormTarget::New => match self.tasks.tasks_by_column().first() {
                Some((name, _)) => name.clone(),
                None => return,
            },
            TaskFormTarget::Edit { column, index } => {
                self.tasks.delete_task(&column, index);
                column
            }
        };

        let index = self.tasks.add_task(&column, record);
        let key = self.tasks.tasks(&column)[index].key;
        self.save_tasks();

        // saving applies the full sort order, so look the task up again
        if let Some(pos) = self.tasks.column_names().position(|name| name == column) {
            self.selected_column = pos;
        }
        self.selected_task = self.tasks.position_of(&column, key).unwrap_or(index);
    }

    /// Close the form, asking first when it has unsaved changes.
    pub fn request_close_task_form(&mut self) {
        match &self.task_form {
            Some(form) if form.is_modified() => {
                self.dialog = Some(DialogType::confirm(
                    "Unsaved changes",
                    "Discard unsaved changes?",
                    ConfirmAction::DiscardTaskForm,
                ));
            }
            _ => self.task_form = None,
        }
    }

    pub fn shift_task_form_date(&mut self, days: i64) {
        if let Some(form) = self.task_form.as_mut() {
            form.shift_date(days, dates::today());
        }
    }

    pub fn request_delete_task(&mut self) {
        if let Some(task) = self.selected_task_ref() {
            let message = format!("Delete task \"{}\"?", task.description);
            self.dialog = Some(DialogType::confirm("Delete task", &message, ConfirmAction::DeleteTask));
        }
    }

    /// Delete the selected task and select the one that took its place.
    pub fn delete_selected_task(&mut self) {
        let Some(column) = self.current_column_name().map(str::to_string) else {
            return;
        };
        if self.tasks.delete_task(&column, self.selected_task).is_some() {
            self.clamp_task_selection();
            self.save_tasks();
        }
    }

    pub fn copy_selected_task(&mut self) {
        let Some(text) = self.selected_task_ref().map(|t| t.description.clone()) else {
            return;
        };
        match crate::clipboard::copy_text(&text) {
            Ok(()) => self.show_notification("Copied task to clipboard".to_string(), NotificationLevel::Success),
            Err(e) => {
                log::warn!("Clipboard copy failed: {}", e);
                self.show_notification(format!("Copy failed: {}", e), NotificationLevel::Error);
            }
        }
    }

    fn save_tasks(&mut self) {
        if let Err(e) = self.tasks.save() {
            log::error!("Saving tasks failed: {}", e);
            self.show_notification(format!("Saving tasks failed: {}", e), NotificationLevel::Error);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::models::{Priority, TaskRecord};
    use crate::test_support::test_app;
    use crate::ui::dialogs::DialogType;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn add(app: &mut App, column: &str, description: &str, priority: u8) {
        app.tasks.add_task(
            column,
            TaskRecord {
                description: description.to_string(),
                priority,
                start_date: String::new(),
                end_date: String::new(),
            },
        );
    }

    fn names(app: &App, column: &str) -> Vec<String> {
        app.tasks.tasks(column).iter().map(|t| t.description.clone()).collect()
    }

    #[test]
    fn test_move_left_from_first_column_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "todo", "a", 1);
        app.move_task(false);
        assert_eq!(names(&app, "todo"), vec!["a"]);
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn test_move_right_from_last_column_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "done", "z", 1);
        app.selected_column = 2;
        app.move_task(true);
        assert_eq!(names(&app, "done"), vec!["z"]);
    }

    #[test]
    fn test_move_from_empty_column_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "doing", "b", 1);
        app.move_task(true);
        assert_eq!(names(&app, "doing"), vec!["b"]);
        assert!(app.tasks.tasks("todo").is_empty());
    }

    #[test]
    fn test_move_right_selects_moved_task_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "todo", "first", 2);
        add(&mut app, "doing", "urgent", 3);
        app.move_task(true);

        assert!(app.tasks.tasks("todo").is_empty());
        assert_eq!(names(&app, "doing"), vec!["first", "urgent"]);
        assert_eq!(app.selected_column, 1);
        assert_eq!(app.selected_task_ref().unwrap().description, "first");
        assert_eq!(app.selected_task_ref().unwrap().column, "doing");

        let saved = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
        assert!(saved.contains("first"));
    }

    #[test]
    fn test_select_column_skips_empty_and_wraps() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "todo", "a", 1);
        add(&mut app, "done", "c", 1);

        app.select_column(true);
        assert_eq!(app.selected_column, 2);
        app.select_column(true);
        assert_eq!(app.selected_column, 0);
        app.select_column(false);
        assert_eq!(app.selected_column, 2);
    }

    #[test]
    fn test_select_column_all_empty_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        app.selected_column = 1;
        app.select_column(true);
        assert_eq!(app.selected_column, 1);
    }

    #[test]
    fn test_select_task_wraps() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "todo", "a", 1);
        add(&mut app, "todo", "b", 2);
        app.select_task(false);
        assert_eq!(app.selected_task, 1);
        app.select_task(true);
        assert_eq!(app.selected_task, 0);
    }

    #[test]
    fn test_new_task_goes_to_first_column() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "todo", "existing", 1);
        app.selected_column = 2;
        app.open_new_task_form();
        let form = app.task_form.as_mut().unwrap();
        for c in "new one".chars() {
            form.input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.submit_task_form();

        assert!(app.task_form.is_none());
        assert_eq!(names(&app, "todo"), vec!["existing", "new one"]);
        assert_eq!(app.selected_column, 0);
        assert_eq!(app.selected_task, 1);
    }

    #[test]
    fn test_edit_replaces_task_in_same_column() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "doing", "old", 3);
        add(&mut app, "doing", "other", 2);
        app.selected_column = 1;
        app.selected_task = 1; // "old" sorts after priority 2
        app.open_edit_task_form();
        let form = app.task_form.as_mut().unwrap();
        form.cycle_priority(false);
        form.cycle_priority(false);
        assert_eq!(form.priority, Priority::High);
        app.submit_task_form();

        assert_eq!(names(&app, "doing"), vec!["old", "other"]);
        assert_eq!(app.selected_task, 0);
        assert_eq!(app.tasks.tasks("doing")[0].priority, Priority::High);
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        app.open_new_task_form();
        app.submit_task_form();
        assert!(app.task_form.as_ref().unwrap().error.is_some());
        assert_eq!(app.tasks.len(), 0);
    }

    #[test]
    fn test_closing_modified_form_asks_first() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        app.open_new_task_form();
        app.request_close_task_form();
        assert!(app.task_form.is_none());

        app.open_new_task_form();
        app.task_form
            .as_mut()
            .unwrap()
            .input(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        app.request_close_task_form();
        assert!(app.task_form.is_some());
        assert!(matches!(app.dialog, Some(DialogType::Confirm { .. })));
    }

    #[test]
    fn test_delete_selects_replacement() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        add(&mut app, "todo", "a", 1);
        add(&mut app, "todo", "b", 2);
        add(&mut app, "todo", "c", 3);
        app.selected_task = 2;
        app.delete_selected_task();
        assert_eq!(names(&app, "todo"), vec!["a", "b"]);
        assert_eq!(app.selected_task, 1);

        app.selected_task = 0;
        app.delete_selected_task();
        assert_eq!(names(&app, "todo"), vec!["b"]);
        assert_eq!(app.selected_task, 0);
    }
}
