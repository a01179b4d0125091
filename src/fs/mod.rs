pub mod notes;
pub mod tasks;
pub mod topics;

pub use notes::{NotesStore, SaveOutcome, SaveReason};
pub use tasks::TasksStore;
pub use topics::TopicsStore;

use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::StoreError;

/// File names inside the data folder
pub const CONFIG_FILE: &str = "config.yaml";
pub const TASKS_FILE: &str = "tasks.json";
pub const TOPICS_FILE: &str = "topics.json";
pub const NOTES_FILE: &str = "notes.md";
pub const LOG_FILE: &str = "tuido.log";

/// Write the whole file through a sibling temp file and a rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let mut f = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
    f.write_all(contents).map_err(|e| StoreError::io(&tmp, e))?;
    f.flush().map_err(|e| StoreError::io(&tmp, e))?;
    drop(f);
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

/// Pretty JSON with four-space indentation.
pub fn to_json_pretty<T: Serialize>(value: &T, path: &Path) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| StoreError::json(path, e))?;
    buf.push(b'\n');
    Ok(buf)
}

/// Read a file, creating it with `initial` first if it does not exist.
pub fn read_or_create(path: &Path, initial: &str) -> Result<String, StoreError> {
    if !path.exists() {
        log::info!("Creating {}", path.display());
        write_atomic(path, initial.as_bytes())?;
        return Ok(initial.to_string());
    }
    fs::read_to_string(path).map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
        assert!(!dir.path().join("a.json.tmp").exists());
    }

    #[test]
    fn test_write_atomic_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.md");
        write_atomic(&path, b"# hi").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# hi");
    }

    #[test]
    fn test_read_or_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        assert_eq!(read_or_create(&path, "{}").unwrap(), "{}");
        assert!(path.exists());
        fs::write(&path, "{\"a\": []}").unwrap();
        assert_eq!(read_or_create(&path, "{}").unwrap(), "{\"a\": []}");
    }

    #[test]
    fn test_json_uses_four_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let value = serde_json::json!({"a": [1]});
        let bytes = to_json_pretty(&value, &dir.path().join("x.json")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\n    \"a\": [\n        1\n    ]"));
    }
}
