//! Error types for data loading and saving.

use thiserror::Error;

/// Errors that can occur when loading archetype, stage or save data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// File could not be written.
    #[error("Failed to write file '{path}': {details}")]
    WriteError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Data parsed but is internally inconsistent.
    #[error("Invalid definition '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    /// A stage refers to an enemy archetype that was never loaded.
    #[error("Stage '{stage}' references unknown enemy archetype '{archetype}'")]
    UnknownArchetype { stage: String, archetype: String },
}
