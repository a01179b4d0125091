use crossterm::event::KeyEvent;

use crate::app::{App, NotesView, NotificationLevel};
use crate::ui::text_input::{input_multi_line, value};

impl App {
    /// Feed a key to the notes editor and hand any change to the store.
    pub fn notes_input(&mut self, key: KeyEvent) {
        if !input_multi_line(&mut self.notes_editor, key) {
            return;
        }
        let text = value(&self.notes_editor);
        let result = self.notes.on_edit(&text);
        self.report_notes_save(result);
    }

    pub fn cycle_notes_view(&mut self) {
        self.notes_view = self.notes_view.next();
        self.notes_editing = self.notes_view != NotesView::Preview;
        self.show_notification(format!("Notes view: {}", self.notes_view.label()), NotificationLevel::Info);
    }

    pub fn scroll_notes(&mut self, down: bool) {
        self.notes_scroll = if down {
            self.notes_scroll.saturating_add(1)
        } else {
            self.notes_scroll.saturating_sub(1)
        };
    }
}
