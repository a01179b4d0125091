use crate::app::{App, NotificationLevel};
use crate::dates;
use crate::fs::topics::{apply_computed_fields, new_topic};
use crate::models::{Topic, TopicAction};
use crate::ui::dialogs::{ConfirmAction, DialogType};

const UNSAVED_WARNING: &str = "Save (Ctrl+S) or discard (Ctrl+R) your changes first.";

impl App {
    /// Topic IDs in table order.
    pub fn topic_ids_desc(&self) -> Vec<i64> {
        self.topics.ids().rev().collect()
    }

    pub fn selected_topic_id(&self) -> Option<i64> {
        self.topic_ids_desc().get(self.selected_topic).copied()
    }

    /// Clamp the table cursor and fill the form from the selected topic.
    pub fn load_selected_topic(&mut self) {
        let count = self.topics.len();
        self.selected_topic = self.selected_topic.min(count.saturating_sub(1));
        let id = self.selected_topic_id();
        let topic = id.and_then(|id| self.topics.by_id(id));
        self.topic_form.load(topic);
    }

    fn block_if_dirty(&mut self) -> bool {
        if self.topic_form.is_dirty() {
            self.show_notification(UNSAVED_WARNING.to_string(), NotificationLevel::Warning);
            return true;
        }
        false
    }

    pub fn select_topic(&mut self, down: bool) {
        if self.block_if_dirty() {
            return;
        }
        let count = self.topics.len();
        if count == 0 {
            return;
        }
        self.selected_topic = if down {
            (self.selected_topic + 1).min(count - 1)
        } else {
            self.selected_topic.saturating_sub(1)
        };
        self.load_selected_topic();
    }

    /// Select a topic by ID; unknown IDs leave the selection alone.
    pub fn select_topic_id(&mut self, id: i64) {
        if let Some(row) = self.topic_ids_desc().iter().position(|&i| i == id) {
            self.selected_topic = row;
            self.load_selected_topic();
        }
    }

    /// Enter the form of the selected topic.
    pub fn edit_topic(&mut self) {
        if self.topic_form.topic_id.is_some() && !self.topic_form.focus_first() {
            self.show_notification("This topic has no editable fields.".to_string(), NotificationLevel::Info);
        }
    }

    pub fn new_topic(&mut self) {
        if self.block_if_dirty() {
            return;
        }
        let id = self.topics.next_id();
        let topic = new_topic(id, dates::today(), &self.config);
        if let Err(e) = self.topics.create(topic) {
            log::error!("Creating topic {} failed: {}", id, e);
            self.show_notification(format!("Saving topics failed: {}", e), NotificationLevel::Error);
        }
        self.select_topic_id(id);
        self.topic_form.focus_first();
    }

    pub fn save_topic(&mut self) {
        let Some(id) = self.topic_form.topic_id else {
            return;
        };
        let mut topic = self.topics.by_id(id).cloned().unwrap_or_else(|| Topic::new(id));
        if !self.topic_form.apply_to(&mut topic) {
            return;
        }
        apply_computed_fields(&mut topic, TopicAction::Edit, dates::today(), &self.config);

        match self.topics.update(id, topic) {
            Ok(true) => {
                self.load_selected_topic();
                self.show_notification(format!("Topic #{} saved", id), NotificationLevel::Success);
            }
            Ok(false) => {
                self.show_notification(format!("Topic with ID {} not found.", id), NotificationLevel::Warning);
            }
            Err(e) => {
                log::error!("Saving topic {} failed: {}", id, e);
                self.show_notification(format!("Saving topics failed: {}", e), NotificationLevel::Error);
            }
        }
    }

    pub fn request_discard_topic(&mut self) {
        if self.topic_form.is_dirty() {
            self.dialog = Some(DialogType::confirm(
                "Discard changes",
                "Discard unsaved changes to this topic?",
                ConfirmAction::DiscardTopicChanges,
            ));
        }
    }

    pub fn discard_topic_changes(&mut self) {
        self.load_selected_topic();
    }

    pub fn request_delete_topic(&mut self) {
        if let Some(id) = self.selected_topic_id() {
            let message = format!("Delete topic #{}?", id);
            self.dialog = Some(DialogType::confirm("Delete topic", &message, ConfirmAction::DeleteTopic(id)));
        }
    }

    pub fn delete_topic(&mut self, id: i64) {
        match self.topics.delete(id) {
            Ok(true) => log::info!("Deleted topic {}", id),
            Ok(false) => log::warn!("Topic with ID {} not found.", id),
            Err(e) => {
                log::error!("Deleting topic {} failed: {}", id, e);
                self.show_notification(format!("Saving topics failed: {}", e), NotificationLevel::Error);
            }
        }
        self.topic_form.blur();
        self.load_selected_topic();
    }
}
