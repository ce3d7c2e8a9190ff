// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Subscriber write endpoints.

use crate::error::SinkError;
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Write capability of one live subscriber.
///
/// `deliver` must not block: it is called for every sink in turn during a
/// publish, and a slow sink must not hold up the rest.
pub trait EventSink: Send + Sync {
    fn deliver(&self, frame: Bytes) -> Result<(), SinkError>;
}

/// Sink backed by a bounded channel drained by the subscriber's connection.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Bytes>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Bytes>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving half, buffering at most `capacity` frames.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, frame: Bytes) -> Result<(), SinkError> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Closed(_) => SinkError::Closed,
            TrySendError::Full(_) => SinkError::Lagging,
        })
    }
}
