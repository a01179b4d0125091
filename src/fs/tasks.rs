use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::dates;
use crate::error::StoreError;
use crate::fs::{read_or_create, to_json_pretty, write_atomic};
use crate::models::{Priority, Task, TaskRecord};

/// The kanban board, persisted as `tasks.json`:
/// `{ "<column>": [ {description, priority, start_date, end_date}, ... ] }`.
///
/// Columns keep their order: configured columns first, then any extra
/// columns found in the file (those are kept and written back).
pub struct TasksStore {
    path: PathBuf,
    columns: Vec<(String, Vec<Task>)>,
    next_key: u64,
    today: NaiveDate,
}

impl TasksStore {
    pub fn load(path: &Path, column_names: &[String]) -> Result<Self, StoreError> {
        Self::load_at(path, column_names, dates::today())
    }

    /// Load with an explicit "today" for the derived day offsets.
    pub fn load_at(
        path: &Path,
        column_names: &[String],
        today: NaiveDate,
    ) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.to_path_buf(),
            columns: column_names
                .iter()
                .map(|name| (name.clone(), Vec::new()))
                .collect(),
            next_key: 1,
            today,
        };

        let content = read_or_create(path, "{}\n")?;
        if content.trim().is_empty() {
            return Ok(store);
        }

        let root: Value = serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))?;
        let Value::Object(root) = root else {
            return Err(StoreError::InvalidFormat {
                path: path.to_path_buf(),
                reason: "expected an object mapping column names to task lists".to_string(),
            });
        };

        let mut count = 0;
        for (column, items) in root {
            let Value::Array(items) = items else {
                return Err(StoreError::InvalidFormat {
                    path: path.to_path_buf(),
                    reason: format!("column '{}' is not a list", column),
                });
            };
            if !store.has_column(&column) {
                log::warn!("Column '{}' in {} is not configured", column, path.display());
            }
            for item in &items {
                let mut task = parse_task(&column, item);
                task.refresh_days(today);
                task.key = store.take_key();
                store.column_mut(&column).push(task);
                count += 1;
            }
        }

        store.sort_all();
        log::info!("Loaded {} tasks from {}", count, path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Columns in board order with their tasks.
    pub fn tasks_by_column(&self) -> &[(String, Vec<Task>)] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|(name, _)| name == column)
    }

    /// Tasks of a column; empty for unknown columns.
    pub fn tasks(&self, column: &str) -> &[Task] {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, tasks)| tasks.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(|(_, tasks)| tasks.len()).sum()
    }

    /// Append a task and re-sort the column by priority only.
    /// Returns the new task's position.
    pub fn add_task(&mut self, column: &str, record: TaskRecord) -> usize {
        let mut task = Task::new(
            column,
            record.description,
            Priority::from_number(record.priority as i64),
            record.start_date,
            record.end_date,
        );
        task.refresh_days(self.today);
        let key = self.take_key();
        task.key = key;

        let tasks = self.column_mut(column);
        tasks.push(task);
        tasks.sort_by_key(|t| t.priority);
        tasks.iter().position(|t| t.key == key).unwrap_or(tasks.len() - 1)
    }

    /// Remove the task at `index`. Unknown column or out-of-range index is a no-op.
    pub fn delete_task(&mut self, column: &str, index: usize) -> Option<Task> {
        let Some((_, tasks)) = self.columns.iter_mut().find(|(name, _)| name == column) else {
            log::warn!("delete_task: unknown column '{}'", column);
            return None;
        };
        if index >= tasks.len() {
            log::warn!(
                "delete_task: index {} out of range for column '{}' ({} tasks)",
                index,
                column,
                tasks.len()
            );
            return None;
        }
        Some(tasks.remove(index))
    }

    /// Move the task at `index` from `source` to `target`, then re-sort the
    /// target column. The source column stays sorted after a removal, so
    /// every column is in order afterwards. Returns the task's runtime key.
    pub fn transfer(&mut self, source: &str, index: usize, target: &str) -> Option<u64> {
        if !self.has_column(target) {
            log::warn!("transfer: unknown target column '{}'", target);
            return None;
        }
        let mut task = self.delete_task(source, index)?;
        let key = task.key;
        task.column = target.to_string();
        self.column_mut(target).push(task);
        self.sort(target);
        Some(key)
    }

    /// Current position of the task with `key` in `column`.
    pub fn position_of(&self, column: &str, key: u64) -> Option<usize> {
        self.tasks(column).iter().position(|t| t.key == key)
    }

    /// Stable sort by priority, start date, end date, description.
    pub fn sort(&mut self, column: &str) {
        if let Some((_, tasks)) = self.columns.iter_mut().find(|(name, _)| name == column) {
            sort_tasks(tasks);
        }
    }

    pub fn sort_all(&mut self) {
        for (_, tasks) in &mut self.columns {
            sort_tasks(tasks);
        }
    }

    /// Sort, drop derived fields and write the whole board.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.sort_all();

        let mut root = Map::new();
        for (name, tasks) in &self.columns {
            let records: Vec<TaskRecord> = tasks.iter().map(Task::to_record).collect();
            let value = serde_json::to_value(records).map_err(|e| StoreError::json(&self.path, e))?;
            root.insert(name.clone(), value);
        }

        let bytes = to_json_pretty(&Value::Object(root), &self.path)?;
        write_atomic(&self.path, &bytes)?;
        log::info!("Saved {} tasks to {}", self.len(), self.path.display());
        Ok(())
    }

    fn take_key(&mut self) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    /// The column's task list, created at the end if missing.
    fn column_mut(&mut self, column: &str) -> &mut Vec<Task> {
        let index = match self.columns.iter().position(|(name, _)| name == column) {
            Some(i) => i,
            None => {
                self.columns.push((column.to_string(), Vec::new()));
                self.columns.len() - 1
            }
        };
        &mut self.columns[index].1
    }
}

fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_cached_key(Task::sort_key);
}

/// Lenient record parsing: missing strings become empty, priority may be a
/// number, a numeric string or a label, anything else is `Unset`.
fn parse_task(column: &str, item: &Value) -> Task {
    let text = |key: &str| match item.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => {
            log::warn!("Task field '{}' is not a string: {}", key, other);
            other.to_string()
        }
    };

    let priority = match item.get("priority") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Priority::from_number)
            .unwrap_or_default(),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Priority::from_number)
            .unwrap_or_else(|_| Priority::from_label(s)),
        _ => Priority::Unset,
    };

    Task::new(
        column,
        text("description"),
        priority,
        text("start_date"),
        text("end_date"),
    )
}
