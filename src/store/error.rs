use thiserror::Error;

use crate::domain::{tag::TagId, track::TrackId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tag with name \"{0}\" already exists")]
    DuplicateTag(String),

    #[error("invalid user data: {0}")]
    Schema(#[from] SchemaError),

    #[error("track {0} not found")]
    TrackNotFound(TrackId),

    #[error("tag {0} not found")]
    TagNotFound(TagId),
}

/// Why an imported document was rejected.
///
/// Paths use the `$.tracks[2].artists[0]` notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// `message` already names the line and column
    #[error("malformed JSON: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: expected {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("{path}: unknown tag type \"{found}\"")]
    UnknownTagType { path: String, found: String },

    #[error("{path}: duplicate value \"{value}\"")]
    Duplicate { path: String, value: String },
}

impl SchemaError {
    /// JSON path of the offending value, if the error is structural
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::Syntax { .. } => None,
            SchemaError::MissingField { path }
            | SchemaError::WrongType { path, .. }
            | SchemaError::UnknownTagType { path, .. }
            | SchemaError::Duplicate { path, .. } => Some(path),
        }
    }
}
