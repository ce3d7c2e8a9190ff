// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Audit Log Reader
//!
//! The audit log is written by the WAF, one JSON record per line, oldest
//! first. This crate only ever reads it.
//!
//! # Reading Contract
//! - Missing file = no events recorded yet (empty result, not an error)
//! - Lines are decoded one at a time; a bad line is logged and skipped
//! - Blank lines are skipped silently
//! - [`EventStore::read_all`] returns newest-first
//! - The file is opened per scan and closed when the scan ends

use crate::error::StoreError;
use crate::event::Event;
use crate::parser;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// Result of one full pass over the log, in file order.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Admitted events, oldest first.
    pub events: Vec<Event>,
    /// Non-blank lines that failed to decode.
    pub skipped: usize,
}

/// Handle to the append-only audit log.
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Replay every recorded event, newest first.
    pub fn read_all(&self) -> Result<Vec<Event>, StoreError> {
        let mut report = self.scan()?;
        report.events.reverse();
        Ok(report.events)
    }

    /// Sequential pass over the whole log in file order.
    pub fn scan(&self) -> Result<ScanReport, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Event log {:?} not found, nothing recorded yet", self.path);
                return Ok(ScanReport::default());
            }
            Err(e) => return Err(self.read_error(e)),
        };

        let mut reader = BufReader::new(file);
        let mut report = ScanReport::default();
        let mut line = Vec::new();
        let mut line_no = 0usize;

        loop {
            line.clear();
            let n = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| self.read_error(e))?;
            if n == 0 {
                break;
            }
            line_no += 1;

            let trimmed = trim_ascii(&line);
            if trimmed.is_empty() {
                continue;
            }

            match parser::parse_line(trimmed) {
                Ok(event) => report.events.push(event),
                Err(e) => {
                    report.skipped += 1;
                    tracing::warn!("Skipping event log line {} in {:?}: {}", line_no, self.path, e);
                }
            }
        }

        tracing::debug!(
            "Scanned {:?}: {} events, {} skipped",
            self.path,
            report.events.len(),
            report.skipped
        );
        Ok(report)
    }

    fn read_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            source,
        }
    }
}

fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if first.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = bytes {
        if last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}
