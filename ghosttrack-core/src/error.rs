//! Error types surfaced by storage and configuration.
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while reading or writing a domain file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {domain} records: {source}")]
    Encode {
        domain: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised when session configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("column count must be at least 1 (got {0})")]
    Columns(usize),
    #[error("{field} must not be empty")]
    EmptyFileName { field: &'static str },
    #[error("{field} must be a bare file name (got {value:?})")]
    NestedFileName { field: &'static str, value: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}
