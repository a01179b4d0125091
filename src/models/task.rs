use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;

/// Task priority. Persisted as its ordinal (1..=4); lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
    #[default]
    Unset = 4,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::Unset,
    ];

    /// 1/2/3 map to High/Medium/Low, everything else to `Unset`.
    pub fn from_number(n: i64) -> Self {
        match n {
            1 => Priority::High,
            2 => Priority::Medium,
            3 => Priority::Low,
            _ => Priority::Unset,
        }
    }

    /// Case-insensitive `High`/`Medium`/`Low`, everything else is `Unset`.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Unset,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unset => "None",
        }
    }

    pub fn next(self) -> Self {
        Priority::from_number(self.number() as i64 % 4 + 1)
    }

    pub fn prev(self) -> Self {
        Priority::from_number((self.number() as i64 + 2) % 4 + 1)
    }
}

/// A task on the board.
///
/// `days_to_start`, `days_to_end` and `key` are derived at runtime and never
/// written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub column: String,
    pub description: String,
    pub priority: Priority,
    pub start_date: String,
    pub end_date: String,
    pub days_to_start: Option<i64>,
    pub days_to_end: Option<i64>,
    pub key: u64,
}

impl Task {
    pub fn new(
        column: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            description: description.into(),
            priority,
            start_date: start_date.into(),
            end_date: end_date.into(),
            days_to_start: None,
            days_to_end: None,
            key: 0,
        }
    }

    /// Recompute the day offsets relative to `today`.
    pub fn refresh_days(&mut self, today: NaiveDate) {
        self.days_to_start = dates::days_until(&self.start_date, today);
        self.days_to_end = dates::days_until(&self.end_date, today);
    }

    /// Full board ordering: priority, start date, end date, description
    /// (case-insensitive). Missing dates sort last.
    pub fn sort_key(&self) -> (Priority, NaiveDate, NaiveDate, String) {
        (
            self.priority,
            dates::sort_key(&self.start_date),
            dates::sort_key(&self.end_date),
            self.description.to_lowercase(),
        )
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            description: self.description.clone(),
            priority: self.priority.number(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

/// On-disk shape of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub description: String,
    pub priority: u8,
    pub start_date: String,
    pub end_date: String,
}
