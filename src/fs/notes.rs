use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::StoreError;
use crate::fs::{read_or_create, write_atomic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReason {
    /// Periodic save while typing continues.
    Throttle,
    /// Typing paused long enough.
    Debounce,
    /// Explicit save, e.g. on quit.
    Flush,
}

impl fmt::Display for SaveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaveReason::Throttle => "throttle",
            SaveReason::Debounce => "debounce",
            SaveReason::Flush => "flush",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SaveReason),
    /// A save was due but the text matched the file.
    Unchanged,
    /// Nothing was due.
    Idle,
}

/// The notes document (`notes.md`) with its throttle + debounce save policy.
///
/// Every edit reports the full text. A save happens right away when the
/// throttle interval has elapsed since the last throttled save (or none
/// happened yet), and a single debounce deadline is pushed back on every
/// edit; [`NotesStore::tick`] saves once it passes. Saving is skipped when
/// the text equals what was last written.
pub struct NotesStore {
    path: PathBuf,
    text: String,
    persisted: String,
    throttle: Duration,
    debounce: Duration,
    last_throttle_save: Option<Instant>,
    debounce_deadline: Option<Instant>,
}

impl NotesStore {
    /// Read the notes, creating an empty file if needed.
    pub fn load(path: &Path, throttle: Duration, debounce: Duration) -> Result<Self, StoreError> {
        let text = read_or_create(path, "")?;
        log::info!("Loaded notes from {} ({} bytes)", path.display(), text.len());
        Ok(Self {
            path: path.to_path_buf(),
            persisted: text.clone(),
            text,
            throttle,
            debounce,
            last_throttle_save: None,
            debounce_deadline: None,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True while a debounce save is scheduled.
    pub fn has_pending(&self) -> bool {
        self.debounce_deadline.is_some()
    }

    /// True if the in-memory text differs from the file.
    pub fn is_dirty(&self) -> bool {
        self.text != self.persisted
    }

    pub fn on_edit(&mut self, text: &str) -> Result<SaveOutcome, StoreError> {
        self.on_edit_at(text, Instant::now())
    }

    pub fn on_edit_at(&mut self, text: &str, now: Instant) -> Result<SaveOutcome, StoreError> {
        if self.text != text {
            self.text = text.to_string();
        }

        // Rearm first so a failed throttle save still leaves a retry pending.
        self.debounce_deadline = Some(now + self.debounce);

        let throttle_due = self
            .last_throttle_save
            .is_none_or(|last| now.saturating_duration_since(last) >= self.throttle);
        if !throttle_due {
            return Ok(SaveOutcome::Idle);
        }
        self.last_throttle_save = Some(now);
        self.persist(SaveReason::Throttle)
    }

    /// Called from the event loop; saves once the debounce deadline passed.
    pub fn tick(&mut self) -> Result<SaveOutcome, StoreError> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Result<SaveOutcome, StoreError> {
        match self.debounce_deadline {
            Some(deadline) if now >= deadline => {
                self.debounce_deadline = None;
                self.persist(SaveReason::Debounce)
            }
            _ => Ok(SaveOutcome::Idle),
        }
    }

    /// Cancel any pending debounce and save now.
    pub fn flush(&mut self) -> Result<SaveOutcome, StoreError> {
        self.debounce_deadline = None;
        self.persist(SaveReason::Flush)
    }

    fn persist(&mut self, reason: SaveReason) -> Result<SaveOutcome, StoreError> {
        if self.text == self.persisted {
            return Ok(SaveOutcome::Unchanged);
        }
        write_atomic(&self.path, self.text.as_bytes())?;
        self.persisted = self.text.clone();
        log::info!("Saved notes to {} ({})", self.path.display(), reason);
        Ok(SaveOutcome::Saved(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const T: Duration = Duration::from_secs(5);

    fn secs(base: Instant, s: f64) -> Instant {
        base + Duration::from_secs_f64(s)
    }

    fn store(dir: &TempDir) -> NotesStore {
        NotesStore::load(&dir.path().join("notes.md"), T, T).unwrap()
    }

    fn on_disk(dir: &TempDir) -> String {
        std::fs::read_to_string(dir.path().join("notes.md")).unwrap()
    }

    #[test]
    fn test_load_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let notes = store(&dir);
        assert_eq!(notes.text(), "");
        assert_eq!(on_disk(&dir), "");
        assert!(!notes.has_pending());
    }

    #[test]
    fn test_burst_saves_once_by_throttle_once_by_debounce() {
        let dir = TempDir::new().unwrap();
        let mut notes = store(&dir);
        let t0 = Instant::now();

        assert_eq!(notes.on_edit_at("a", t0).unwrap(), SaveOutcome::Saved(SaveReason::Throttle));
        assert_eq!(on_disk(&dir), "a");
        assert_eq!(notes.on_edit_at("ab", secs(t0, 1.0)).unwrap(), SaveOutcome::Idle);
        assert_eq!(notes.on_edit_at("abc", secs(t0, 2.0)).unwrap(), SaveOutcome::Idle);
        assert_eq!(on_disk(&dir), "a");

        // deadline is 2 + 5
        assert_eq!(notes.tick_at(secs(t0, 6.9)).unwrap(), SaveOutcome::Idle);
        assert_eq!(
            notes.tick_at(secs(t0, 7.0)).unwrap(),
            SaveOutcome::Saved(SaveReason::Debounce)
        );
        assert_eq!(on_disk(&dir), "abc");
        assert!(!notes.has_pending());
        assert_eq!(notes.tick_at(secs(t0, 20.0)).unwrap(), SaveOutcome::Idle);
    }

    #[test]
    fn test_long_burst_saves_every_throttle_interval() {
        let dir = TempDir::new().unwrap();
        let mut notes = store(&dir);
        let t0 = Instant::now();
        let mut saves = Vec::new();
        for i in 0..=12 {
            let text = "x".repeat(i + 1);
            if let SaveOutcome::Saved(reason) = notes.on_edit_at(&text, secs(t0, i as f64)).unwrap() {
                saves.push((i, reason));
            }
        }
        assert_eq!(
            saves,
            vec![
                (0, SaveReason::Throttle),
                (5, SaveReason::Throttle),
                (10, SaveReason::Throttle)
            ]
        );
    }

    #[test]
    fn test_unchanged_text_is_not_written() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.md"), "same").unwrap();
        let mut notes = store(&dir);
        let t0 = Instant::now();

        assert_eq!(notes.on_edit_at("same", t0).unwrap(), SaveOutcome::Unchanged);
        assert_eq!(notes.tick_at(secs(t0, 5.0)).unwrap(), SaveOutcome::Unchanged);
        assert_eq!(notes.flush().unwrap(), SaveOutcome::Unchanged);
    }

    #[test]
    fn test_edit_and_revert_within_window_writes_nothing_new() {
        let dir = TempDir::new().unwrap();
        let mut notes = store(&dir);
        let t0 = Instant::now();
        notes.on_edit_at("draft", t0).unwrap();
        notes.on_edit_at("draft!", secs(t0, 1.0)).unwrap();
        notes.on_edit_at("draft", secs(t0, 2.0)).unwrap();
        assert_eq!(notes.tick_at(secs(t0, 7.0)).unwrap(), SaveOutcome::Unchanged);
        assert_eq!(on_disk(&dir), "draft");
    }

    #[test]
    fn test_flush_cancels_pending_debounce() {
        let dir = TempDir::new().unwrap();
        let mut notes = store(&dir);
        let t0 = Instant::now();
        notes.on_edit_at("one", t0).unwrap();
        notes.on_edit_at("one two", secs(t0, 1.0)).unwrap();
        assert!(notes.is_dirty());
        assert_eq!(notes.flush().unwrap(), SaveOutcome::Saved(SaveReason::Flush));
        assert!(!notes.has_pending());
        assert!(!notes.is_dirty());
        assert_eq!(notes.tick_at(secs(t0, 10.0)).unwrap(), SaveOutcome::Idle);
        assert_eq!(on_disk(&dir), "one two");
    }
}
