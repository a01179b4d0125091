//! UI state persisted between runs (`state.json` next to the settings).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::{App, NotesView, Tab};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub tab: Tab,
    pub selected_column: usize,
    pub selected_task: usize,
    /// Topic shown in the form, by ID so it survives inserts
    pub selected_topic_id: Option<i64>,
    pub notes_view: NotesView,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            tab: Tab::Tasks,
            selected_column: 0,
            selected_task: 0,
            selected_topic_id: None,
            notes_view: NotesView::Split,
        }
    }
}

pub fn state_path() -> Option<PathBuf> {
    crate::settings::config_dir().map(|dir| dir.join("state.json"))
}

pub fn extract_state(app: &App) -> AppState {
    AppState {
        tab: app.tab,
        selected_column: app.selected_column,
        selected_task: app.selected_task,
        selected_topic_id: app.selected_topic_id(),
        notes_view: app.notes_view,
    }
}

pub fn save_state(path: &Path, state: &AppState) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Missing file gives the default state.
pub fn load_state(path: &Path) -> Result<AppState> {
    if !path.exists() {
        return Ok(AppState::default());
    }
    let content = std::fs::read_to_string(path)?;
    let state: AppState = serde_json::from_str(&content)?;
    Ok(state)
}

/// Restore a saved state; positions that no longer exist are clamped.
pub fn apply_state(app: &mut App, state: AppState) {
    app.switch_tab(state.tab);
    app.selected_column = state.selected_column;
    app.selected_task = state.selected_task;
    app.clamp_task_selection();

    if let Some(id) = state.selected_topic_id {
        app.select_topic_id(id);
    }

    app.notes_view = state.notes_view;
    app.notes_editing = state.notes_view != NotesView::Preview;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskRecord;
    use crate::test_support::test_app;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_default() {
        let dir = TempDir::new().unwrap();
        let state = load_state(&dir.path().join("state.json")).unwrap();
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let state = AppState {
            tab: Tab::Notes,
            selected_column: 2,
            selected_task: 1,
            selected_topic_id: Some(7),
            notes_view: NotesView::Preview,
        };
        save_state(&path, &state).unwrap();
        assert_eq!(load_state(&path).unwrap(), state);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_state(&path).is_err());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"tab": "topics"}"#).unwrap();
        let state = load_state(&path).unwrap();
        assert_eq!(state.tab, Tab::Topics);
        assert_eq!(state.notes_view, NotesView::Split);
    }

    #[test]
    fn test_apply_clamps_out_of_range_positions() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path());
        app.tasks.add_task(
            "doing",
            TaskRecord {
                description: "only".to_string(),
                priority: 2,
                start_date: String::new(),
                end_date: String::new(),
            },
        );
        apply_state(
            &mut app,
            AppState {
                tab: Tab::Tasks,
                selected_column: 9,
                selected_task: 4,
                selected_topic_id: Some(42),
                notes_view: NotesView::Editor,
            },
        );
        assert_eq!(app.selected_column, 2);
        assert_eq!(app.selected_task, 0);
        assert_eq!(app.selected_topic_id(), None);

        apply_state(
            &mut app,
            AppState {
                selected_column: 1,
                selected_task: 3,
                ..AppState::default()
            },
        );
        assert_eq!(app.selected_column, 1);
        assert_eq!(app.selected_task, 0);
    }
}
