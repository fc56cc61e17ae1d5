//! Error types for each pipeline stage
//!
//! Harvest and emission failures are fatal for the stage that raised them.
//! Record failures are collected per invocation so a single bad log line
//! never aborts a batch.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Log directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Log path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Found no files matching {pattern} in {}", dir.display())]
    NoMatches { pattern: String, dir: PathBuf },

    #[error("No files left after filter on {filter}")]
    FilteredOut { filter: String },

    #[error("Failed to read directory entry: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read log file {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    #[error("Failed to decode log file {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

impl HarvestError {
    /// True for the "nothing to do" outcomes that are reported but not fatal.
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            HarvestError::NoMatches { .. } | HarvestError::FilteredOut { .. }
        )
    }
}

/// Why one raw invocation could not be turned into a compile invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("no quoted source terminator (newline followed by '\"') or trailing line break")]
    MissingTerminator,

    #[error("no space separator before the source path")]
    MissingSeparator,

    #[error("source path is empty")]
    EmptySource,

    #[error("failed to normalize path '{path}': {message}")]
    Normalize { path: String, message: String },

    #[error("duplicate source file {0} rejected")]
    DuplicateSource(String),
}

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to create build file {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("Failed to write build file: {0}")]
    Write(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
