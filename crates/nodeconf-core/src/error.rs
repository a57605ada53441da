//! Error types for settings persistence and form binding.

use std::io;

use thiserror::Error;

use crate::value::FieldKind;

/// Errors that can occur while loading settings.
///
/// Every variant leaves the store untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The settings file is missing or unreadable.
    #[error("Failed to open config file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The settings file exceeds the size limit.
    #[error("Config file size is too large ({size} > {max} bytes)")]
    TooLarge { size: u64, max: usize },

    /// The content is not valid JSON.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The content is valid JSON but not an object.
    #[error("Config file is not a JSON object")]
    NotAnObject,
}

impl LoadError {
    /// True for malformed content (invalid JSON or not an object).
    pub fn is_parse_error(&self) -> bool {
        matches!(self, LoadError::Parse(_) | LoadError::NotAnObject)
    }
}

/// Errors that can occur while saving settings.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The settings file could not be written.
    #[error("Failed to open config file {path} for writing: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The encoded document would exceed what `load` accepts.
    #[error("Encoded config is too large ({size} > {max} bytes)")]
    TooLarge { size: usize, max: usize },

    /// JSON serialization failed.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from typed field access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} holds {expected} values, got {actual}")]
    KindMismatch {
        field: &'static str,
        expected: FieldKind,
        actual: FieldKind,
    },
}

/// A numeric form argument rejected by strict form binding.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid {kind} value {input:?} for field {field}")]
pub struct InvalidNumber {
    pub field: &'static str,
    pub kind: FieldKind,
    pub input: String,
}

/// All fields rejected by one strict form submission.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} form field(s) rejected", .0.len())]
pub struct FormErrors(pub Vec<InvalidNumber>);
