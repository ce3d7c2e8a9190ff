// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// A single audit line that could not be admitted as an event.
///
/// Always carries the offending line so the caller can log it and move on.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid JSON ({reason}): {line}")]
    InvalidJson { line: String, reason: String },
    #[error("record has no transaction object: {line}")]
    MissingTransaction { line: String },
}

impl ParseError {
    /// The raw line that was rejected.
    pub fn line(&self) -> &str {
        match self {
            ParseError::InvalidJson { line, .. } => line,
            ParseError::MissingTransaction { line } => line,
        }
    }
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read event log {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a subscriber sink refused a frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    #[error("subscriber channel closed")]
    Closed,
    #[error("subscriber buffer full")]
    Lagging,
}
