//! Error types.

use crate::var::VarType;

/// Why a tree node could not be adopted as a field marking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatch {
    #[error("expected {expected} children, found {found}")]
    ChildCount { expected: usize, found: usize },
    #[error("unexpected child '{0}'")]
    UnexpectedChild(String),
    #[error("duplicate child '{0}'")]
    DuplicateChild(String),
    #[error("child '{name}' should be {expected:?}, found {found:?}")]
    WrongType {
        name: String,
        expected: VarType,
        found: VarType,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error(
        "{kind} collection out of sync: {records} records, {children} tree children, count {count}"
    )]
    Inconsistent {
        kind: &'static str,
        records: usize,
        children: usize,
        count: i64,
    },
    #[error("{kind} {index} is not backed by tree child {index}")]
    Misplaced { kind: &'static str, index: usize },
    #[error("settings root is '{found}', expected '{expected}'")]
    RootMismatch { expected: String, found: String },
    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
}
