use thiserror::Error;

use crate::element::NodePath;

/// Structural failures raised while decoding an element tree into typed values.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected element `{expected}` but found `{found}` at {path}")]
    KindMismatch {
        expected: &'static str,
        found: String,
        path: NodePath,
    },

    #[error("expected category class `{expected}` but found {found:?} at {path}")]
    MissingClassification {
        expected: &'static str,
        found: Vec<String>,
        path: NodePath,
    },

    #[error("unknown category classes {tags:?} at {path}")]
    UnknownCategory { tags: Vec<String>, path: NodePath },

    #[error("missing required field `{field}` at {path}")]
    MissingField { field: &'static str, path: NodePath },

    #[error("malformed value for `{field}`: {raw} at {path}")]
    MalformedScalar {
        field: &'static str,
        raw: String,
        path: NodePath,
    },

    #[error("data structure must have exactly one child, found {children} at {path}")]
    UnknownDataStructure { children: usize, path: NodePath },

    #[error("not supported: {construct} at {path}")]
    NotSupported { construct: String, path: NodePath },
}

impl DecodeError {
    /// The location of the offending node, when the error has one.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            DecodeError::Json(_) => None,
            DecodeError::KindMismatch { path, .. }
            | DecodeError::MissingClassification { path, .. }
            | DecodeError::UnknownCategory { path, .. }
            | DecodeError::MissingField { path, .. }
            | DecodeError::MalformedScalar { path, .. }
            | DecodeError::UnknownDataStructure { path, .. }
            | DecodeError::NotSupported { path, .. } => Some(path),
        }
    }
}

/// Semantic failures raised while turning a decoded document into the IR.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("undefined: {0}")]
    Undefined(String),
}

impl ConversionError {
    /// Append where the error was raised, e.g. `in GET /notes/{id}`.
    pub fn context(self, location: impl std::fmt::Display) -> Self {
        match self {
            ConversionError::NotSupported(msg) => {
                ConversionError::NotSupported(format!("{msg} in {location}"))
            }
            ConversionError::Undefined(msg) => {
                ConversionError::Undefined(format!("{msg} in {location}"))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template error: {0}")]
    Template(String),

    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
}
