// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Scoped subscriptions.
//!
//! A [`SubscriptionGuard`] owns one registration and releases it when dropped,
//! whatever path the connection took to end (client close, write failure,
//! shutdown, panic).

use super::{ChannelSink, EventFanout, EventSink, SubscriptionHandle};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct SubscriptionGuard {
    fanout: Arc<dyn EventFanout>,
    handle: SubscriptionHandle,
}

impl SubscriptionGuard {
    /// Register `sink` and tie the registration to the returned guard.
    pub fn register(fanout: Arc<dyn EventFanout>, sink: Arc<dyn EventSink>) -> Self {
        let handle = fanout.register(sink);
        Self { fanout, handle }
    }

    pub fn handle(&self) -> SubscriptionHandle {
        self.handle
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        // Idempotent: the sink may already have been pruned by a failed publish.
        self.fanout.unregister(self.handle);
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("handle", &self.handle)
            .finish()
    }
}

/// Register a channel-backed sink holding at most `capacity` undelivered frames.
pub fn open_channel(
    fanout: Arc<dyn EventFanout>,
    capacity: usize,
) -> (SubscriptionGuard, mpsc::Receiver<Bytes>) {
    let (sink, rx) = ChannelSink::channel(capacity);
    let guard = SubscriptionGuard::register(fanout, Arc::new(sink));
    (guard, rx)
}
