use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tui_textarea::TextArea;

use crate::config::Config;
use crate::fs::{self, NotesStore, SaveOutcome, TasksStore, TopicsStore};
use crate::settings::Settings;
use crate::ui::dialogs::DialogType;
use crate::ui::task_form::TaskForm;
use crate::ui::text_input;
use crate::ui::topic_form::TopicForm;

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Notification message
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// Notifications disappear after 3 seconds
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Tasks,
    Topics,
    Notes,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Tasks, Tab::Topics, Tab::Notes];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Tasks => "Tasks",
            Tab::Topics => "Topics",
            Tab::Notes => "Notes",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Tasks => 0,
            Tab::Topics => 1,
            Tab::Notes => 2,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation and editing
    Normal,
    /// Key binding overlay
    Help,
}

/// Layout of the notes tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesView {
    Editor,
    Preview,
    Split,
}

impl NotesView {
    pub fn next(self) -> Self {
        match self {
            NotesView::Editor => NotesView::Split,
            NotesView::Split => NotesView::Preview,
            NotesView::Preview => NotesView::Editor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NotesView::Editor => "editor",
            NotesView::Preview => "preview",
            NotesView::Split => "editor + preview",
        }
    }
}

/// Application state
pub struct App {
    pub config: Config,
    pub settings: Settings,
    pub data_folder: PathBuf,
    pub tasks: TasksStore,
    pub topics: TopicsStore,
    pub notes: NotesStore,

    /// Active tab
    pub tab: Tab,
    pub mode: Mode,
    /// Confirmation or info dialog shown above everything else
    pub dialog: Option<DialogType>,
    pub notification: Option<Notification>,

    /// Board cursor: column index into the tasks store and task row
    pub selected_column: usize,
    pub selected_task: usize,
    /// Open new/edit task form
    pub task_form: Option<TaskForm>,

    /// Row in the topics table (sorted by ID, descending)
    pub selected_topic: usize,
    pub topic_form: TopicForm,

    pub notes_editor: TextArea<'static>,
    pub notes_view: NotesView,
    /// Whether keys go to the notes editor
    pub notes_editing: bool,
    pub notes_scroll: u16,
}

fn secs(value: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_else(|_| Duration::from_secs_f64(fallback))
}

impl App {
    /// Load the stores from `data_folder`
    pub fn new(config: Config, settings: Settings, data_folder: &Path) -> Result<Self> {
        let tasks = TasksStore::load(&data_folder.join(fs::TASKS_FILE), &config.task_column_names)
            .context("loading tasks")?;
        let topics = TopicsStore::load(&data_folder.join(fs::TOPICS_FILE)).context("loading topics")?;
        let notes = NotesStore::load(
            &data_folder.join(fs::NOTES_FILE),
            secs(settings.notes.throttle_secs, 5.0),
            secs(settings.notes.debounce_secs, 5.0),
        )
        .context("loading notes")?;

        let notes_editor = text_input::multi_line(notes.text());
        let topic_form = TopicForm::new(&config);

        let mut app = Self {
            config,
            settings,
            data_folder: data_folder.to_path_buf(),
            tasks,
            topics,
            notes,
            tab: Tab::Tasks,
            mode: Mode::Normal,
            dialog: None,
            notification: None,
            selected_column: 0,
            selected_task: 0,
            task_form: None,
            selected_topic: 0,
            topic_form,
            notes_editor,
            notes_view: NotesView::Split,
            notes_editing: true,
            notes_scroll: 0,
        };
        app.load_selected_topic();

        log::info!(
            "Started with {} tasks, {} topics from {}",
            app.tasks.len(),
            app.topics.len(),
            app.data_folder.display()
        );
        log::debug!(
            "Stores: {}, {}, {}",
            app.tasks.path().display(),
            app.topics.path().display(),
            app.notes.path().display()
        );
        Ok(app)
    }

    /// Handle a key press; returns false when the app should exit
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        use crate::input::handle_key_input;
        handle_key_input(self, key)
    }

    /// Periodic work from the event loop
    pub fn tick(&mut self) {
        self.clear_expired_notification();
        let result = self.notes.tick();
        self.report_notes_save(result);
    }

    /// Flush pending work before exit
    pub fn shutdown(&mut self) {
        let result = self.notes.flush();
        self.report_notes_save(result);
    }

    pub(crate) fn report_notes_save(&mut self, result: Result<SaveOutcome, crate::error::StoreError>) {
        match result {
            Ok(SaveOutcome::Saved(reason)) => log::debug!("Notes saved ({})", reason),
            Ok(_) => {}
            Err(e) => {
                log::error!("Saving notes failed: {}", e);
                self.show_notification(format!("Saving notes failed: {}", e), NotificationLevel::Error);
            }
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if tab == Tab::Notes && self.notes_view != NotesView::Preview {
            self.notes_editing = true;
        }
    }

    /// Whether keys currently go to a text input
    pub fn is_typing(&self) -> bool {
        self.task_form.is_some()
            || match self.tab {
                Tab::Tasks => false,
                Tab::Topics => self.topic_form.is_focused(),
                Tab::Notes => self.notes_editing && self.notes_view != NotesView::Preview,
            }
    }

    /// Show a notification
    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    /// Clear the notification once expired
    pub fn clear_expired_notification(&mut self) {
        if self.notification.as_ref().is_some_and(Notification::is_expired) {
            self.notification = None;
        }
    }
}
