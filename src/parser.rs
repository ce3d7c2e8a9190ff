// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Audit line decoding. Stateless.

use crate::error::ParseError;
use crate::event::Event;
use serde_json::Value;

/// Decode one audit line into an [`Event`].
///
/// Succeeds iff the line is a JSON object whose `transaction` is an object.
/// Surrounding whitespace is ignored.
pub fn parse_line(raw: &[u8]) -> Result<Event, ParseError> {
    let value: Value = serde_json::from_slice(raw).map_err(|e| ParseError::InvalidJson {
        line: String::from_utf8_lossy(raw).into_owned(),
        reason: e.to_string(),
    })?;

    if !Event::is_transaction_record(&value) {
        return Err(ParseError::MissingTransaction {
            line: String::from_utf8_lossy(raw).into_owned(),
        });
    }
    Ok(Event::from_payload(value))
}

pub fn parse_str(raw: &str) -> Result<Event, ParseError> {
    parse_line(raw.as_bytes())
}
