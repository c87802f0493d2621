//! Error types.
//!
//! Recoverable problems are scoped as tightly as possible: a bad field fails
//! one component, a bad file fails one file. Nothing here is meant to cross a
//! tick boundary.

use std::path::PathBuf;

use thiserror::Error;

use crate::ecs::FieldKind;

/// Errors raised by the [`World`](crate::ecs::World) itself.
#[derive(Debug, Error)]
pub enum EcsError {
    /// Every `u32` entity id has been handed out. Ids are never recycled, so
    /// the world cannot create any more entities.
    #[error("entity id space exhausted after {0} entities")]
    IdsExhausted(u64),
}

/// Errors raised while building a component instance from data.
#[derive(Debug, Error, PartialEq)]
pub enum ComponentError {
    /// A supplied value does not match the field's declared kind.
    #[error("field `{component}.{field}` expects {expected}, got {found}")]
    TypeMismatch {
        component: String,
        field: String,
        expected: FieldKind,
        found: String,
    },

    /// A value of the right kind that the field does not allow.
    #[error("field `{component}.{field}` has unknown value {value} (expected one of {allowed})")]
    UnknownValue {
        component: String,
        field: String,
        value: String,
        allowed: String,
    },

    /// Component data must be a JSON object of field values.
    #[error("component `{component}` data must be an object, got {found}")]
    NotAnObject { component: String, found: String },

    /// A static component could not be converted to or from its record form.
    #[error("component `{component}` conversion failed: {message}")]
    Conversion { component: String, message: String },
}

/// Errors raised while loading schema, entity, or config files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but describes something unusable (e.g. a default that
    /// does not match its field kind).
    #[error("invalid schema `{path}`: {message}")]
    InvalidSchema { path: PathBuf, message: String },
}

impl LoadError {
    /// The file this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::InvalidSchema { path, .. } => path,
        }
    }
}
