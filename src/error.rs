use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading `config.yaml`. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("field '{field}' has unknown type '{kind}' (expected string, number, select or date)")]
    UnknownFieldType { field: String, kind: String },

    #[error("field '{field}' has unknown computed value '{value}' (expected created_date or edit_date)")]
    UnknownComputed { field: String, value: String },

    #[error("config defines no task_columns")]
    NoTaskColumns,
}

/// Errors raised by the file-backed stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected content in {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}
