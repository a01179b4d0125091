//! `config.yaml`: the topic field grid and the kanban columns.
//!
//! ```yaml
//! fields:
//!   - - name: title
//!       caption: Title
//!       type: string
//!       table_column_width: 0
//!   - - name: created
//!       caption: Created
//!       type: date
//!       read_only: true
//!       computed: created_date
//! task_columns:
//!   - name: todo
//!     caption: To do
//! ```
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Select,
    Date,
}

impl FieldType {
    /// Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRING" => Some(FieldType::String),
            "NUMBER" => Some(FieldType::Number),
            "SELECT" => Some(FieldType::Select),
            "DATE" => Some(FieldType::Date),
            _ => None,
        }
    }
}

/// Value a field receives automatically when a topic is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Computed {
    /// Today's date, set once on creation.
    CreatedDate,
    /// Today's date, set on creation and on every edit.
    EditDate,
}

impl Computed {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "created_date" => Some(Computed::CreatedDate),
            "edit_date" => Some(Computed::EditDate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub caption: String,
    pub field_type: FieldType,
    /// 1 = single-line input, more = multi-line text area.
    pub lines: u16,
    pub options: Vec<FieldValue>,
    pub show_in_table: bool,
    /// -1 when hidden, 0 for a flexible column.
    pub table_column_width: i32,
    pub input_width: Option<u16>,
    pub read_only: bool,
    pub computed: Option<Computed>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    fields: Vec<Vec<RawField>>,
    #[serde(default)]
    task_columns: Vec<RawTaskColumn>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    caption: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    lines: Option<u16>,
    #[serde(default)]
    options: Vec<serde_yaml::Value>,
    #[serde(default)]
    table_column_width: Option<i32>,
    #[serde(default)]
    input_width: Option<u16>,
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    computed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTaskColumn {
    name: String,
    caption: String,
}

/// Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Form layout: `fields[row][col]`.
    pub fields: Vec<Vec<FieldDefinition>>,
    /// Same definitions, flattened in row order.
    pub columns: Vec<FieldDefinition>,
    columns_by_name: HashMap<String, usize>,
    pub task_column_names: Vec<String>,
    task_column_captions: HashMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }

    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        let mut fields = Vec::with_capacity(raw.fields.len());
        let mut columns = Vec::new();
        let mut columns_by_name = HashMap::new();

        for raw_row in raw.fields {
            let mut row = Vec::with_capacity(raw_row.len());
            for raw_field in raw_row {
                let def = parse_field(raw_field)?;
                columns_by_name.insert(def.name.clone(), columns.len());
                columns.push(def.clone());
                row.push(def);
            }
            fields.push(row);
        }

        if raw.task_columns.is_empty() {
            return Err(ConfigError::NoTaskColumns);
        }
        let mut task_column_names = Vec::with_capacity(raw.task_columns.len());
        let mut task_column_captions = HashMap::new();
        for col in raw.task_columns {
            task_column_captions.insert(col.name.clone(), col.caption);
            task_column_names.push(col.name);
        }

        log::debug!(
            "Loaded config {}: {} fields, {} task columns",
            path.display(),
            columns.len(),
            task_column_names.len()
        );

        Ok(Self {
            fields,
            columns,
            columns_by_name,
            task_column_names,
            task_column_captions,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.columns_by_name.get(name).map(|&i| &self.columns[i])
    }

    /// Fields shown in the topics table, in config order.
    pub fn table_columns(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.columns.iter().filter(|c| c.show_in_table)
    }

    /// Caption of a kanban column; falls back to its name.
    pub fn column_caption<'a>(&'a self, name: &'a str) -> &'a str {
        self.task_column_captions
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }
}

fn parse_field(raw: RawField) -> Result<FieldDefinition, ConfigError> {
    let field_type = FieldType::parse(&raw.kind).ok_or_else(|| ConfigError::UnknownFieldType {
        field: raw.name.clone(),
        kind: raw.kind.clone(),
    })?;

    let computed = match raw.computed.as_deref() {
        None => None,
        Some(value) => Some(Computed::parse(value).ok_or_else(|| ConfigError::UnknownComputed {
            field: raw.name.clone(),
            value: value.to_string(),
        })?),
    };

    let (show_in_table, table_column_width) = match raw.table_column_width {
        Some(w) if w >= 0 => (true, w),
        _ => (false, -1),
    };

    Ok(FieldDefinition {
        name: raw.name,
        caption: raw.caption,
        field_type,
        lines: raw.lines.unwrap_or(1).max(1),
        options: raw.options.iter().map(yaml_to_field_value).collect(),
        show_in_table,
        table_column_width,
        input_width: raw.input_width,
        read_only: raw.read_only,
        computed,
    })
}

fn yaml_to_field_value(value: &serde_yaml::Value) -> FieldValue {
    match value {
        serde_yaml::Value::Bool(b) => FieldValue::Bool(*b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Float(n.as_f64().unwrap_or_default()),
        },
        serde_yaml::Value::String(s) => FieldValue::Text(s.clone()),
        serde_yaml::Value::Null => FieldValue::empty(),
        other => FieldValue::Text(serde_yaml::to_string(other).unwrap_or_default().trim().to_string()),
    }
}
