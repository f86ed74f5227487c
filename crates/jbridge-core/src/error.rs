//! Error types for jbridge generation runs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Coarse classification of a fatal error.
///
/// Every variant of [`BridgeError`] aborts the run; the category only tells
/// the caller which of the three failure families it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request or the reflected input cannot be expressed as wrappers
    Configuration,
    /// A requested class does not resolve
    NotFound,
    /// Output could not be written
    Io,
}

/// Error type for generation runs
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A type reference kind that the current traversal cannot handle
    #[error("unsupported {kind} type reference in {context}")]
    UnsupportedType { kind: &'static str, context: String },

    /// A wrapper name is already assigned to another class
    #[error("wrapper name '{name}' for {class} is already used by {existing}, use a rename")]
    RenameCollision {
        class: String,
        name: String,
        existing: String,
    },

    /// Invalid request configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed reflection dump
    #[error("invalid class model: {0}")]
    Model(String),

    /// A class name did not resolve through the reflection provider
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// Output directory or file could not be created
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error raised while processing a specific member
    #[error("{class}.{member}: {source}")]
    Member {
        class: String,
        member: String,
        #[source]
        source: Box<BridgeError>,
    },
}

impl BridgeError {
    /// Wrap this error with the class and member signature it occurred in
    pub fn in_member(self, class: impl Into<String>, member: impl Into<String>) -> Self {
        BridgeError::Member {
            class: class.into(),
            member: member.into(),
            source: Box::new(self),
        }
    }

    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BridgeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the failure family of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::UnsupportedType { .. }
            | BridgeError::RenameCollision { .. }
            | BridgeError::Config(_)
            | BridgeError::Model(_) => ErrorCategory::Configuration,
            BridgeError::ClassNotFound(_) => ErrorCategory::NotFound,
            BridgeError::Io { .. } => ErrorCategory::Io,
            BridgeError::Member { source, .. } => source.category(),
        }
    }

    /// Returns a stable error code, suitable as a process exit status
    pub fn error_code(&self) -> u32 {
        match self {
            BridgeError::UnsupportedType { .. } => 1,
            BridgeError::RenameCollision { .. } => 2,
            BridgeError::Config(_) => 3,
            BridgeError::Model(_) => 4,
            BridgeError::ClassNotFound(_) => 5,
            BridgeError::Io { .. } => 6,
            BridgeError::Member { source, .. } => source.error_code(),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Model(err.to_string())
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Config(err.to_string())
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
