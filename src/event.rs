// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! WAF Audit Event
//!
//! One ModSecurity transaction record: client, request, response, producer
//! and the rule messages it triggered.
//!
//! # Representation
//! - The record is kept as the JSON document the WAF produced
//! - Object key order is preserved, so re-serialization matches the input layout
//! - Unknown producer fields pass through untouched
//!
//! # Invariants
//! - Events built by [`Event::from_value`] are objects whose `transaction` is an object
//! - Events are immutable once built

use crate::config::{BLOCKED_HTTP_CODE, FRAME_PREFIX, FRAME_SUFFIX};
use crate::error::{EventError, ParseError};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded WAF transaction record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Event(Value);

/// One triggered rule, as listed under `transaction.messages`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleMessage {
    pub message: String,
    pub details: RuleDetails,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleDetails {
    #[serde(rename = "match")]
    pub matched: String,
    pub reference: String,
    pub rule_id: String,
    pub file: String,
    pub line_number: String,
    pub data: String,
    pub severity: String,
    pub ver: String,
    pub rev: String,
    pub tags: Vec<String>,
    pub maturity: String,
    pub accuracy: String,
}

impl Event {
    /// True when `value` is an object whose `transaction` is itself an object.
    pub fn is_transaction_record(value: &Value) -> bool {
        value
            .get("transaction")
            .map_or(false, Value::is_object)
    }

    /// Admit a decoded JSON document as an event.
    ///
    /// Fails unless the document is an object whose `transaction` is an object.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        if Self::is_transaction_record(&value) {
            Ok(Self(value))
        } else {
            Err(ParseError::MissingTransaction {
                line: value.to_string(),
            })
        }
    }

    /// Wrap a pushed payload without checking its shape.
    ///
    /// The ingest path trusts the producer for structure and only requires
    /// valid JSON.
    pub fn from_payload(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// True when the record carries a `transaction` object.
    pub fn is_well_formed(&self) -> bool {
        self.transaction().is_some()
    }

    pub fn transaction(&self) -> Option<&Map<String, Value>> {
        self.0.get("transaction").and_then(Value::as_object)
    }

    fn tx_str(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }

    pub fn client_ip(&self) -> Option<&str> {
        self.tx_str("/transaction/client_ip")
    }

    pub fn time_stamp(&self) -> Option<&str> {
        self.tx_str("/transaction/time_stamp")
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.tx_str("/transaction/unique_id")
    }

    pub fn method(&self) -> Option<&str> {
        self.tx_str("/transaction/request/method")
    }

    pub fn uri(&self) -> Option<&str> {
        self.tx_str("/transaction/request/uri")
    }

    pub fn http_code(&self) -> Option<u64> {
        self.0
            .pointer("/transaction/response/http_code")
            .and_then(Value::as_u64)
    }

    /// The WAF answered this transaction with a block.
    pub fn is_blocked(&self) -> bool {
        self.http_code() == Some(BLOCKED_HTTP_CODE)
    }

    /// Triggered rules. Entries that do not look like rule messages are skipped.
    pub fn messages(&self) -> Vec<RuleMessage> {
        self.0
            .pointer("/transaction/messages")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| RuleMessage::deserialize(item).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Case-insensitive search over client ip, URI, rule ids and rule texts.
    ///
    /// An empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&needle);

        if self.client_ip().map_or(false, hit) || self.uri().map_or(false, hit) {
            return true;
        }
        self.messages()
            .iter()
            .any(|m| hit(&m.details.rule_id) || hit(&m.message))
    }

    /// Encode the live-stream frame: `data: <json>\n\n`.
    pub fn to_frame(&self) -> Result<Bytes, EventError> {
        let json = serde_json::to_vec(&self.0)?;
        let mut frame = BytesMut::with_capacity(FRAME_PREFIX.len() + json.len() + FRAME_SUFFIX.len());
        frame.put_slice(FRAME_PREFIX);
        frame.put_slice(&json);
        frame.put_slice(FRAME_SUFFIX);
        Ok(frame.freeze())
    }
}
