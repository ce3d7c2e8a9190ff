// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Live Event Fan-Out
//!
//! Every published event is framed once and pushed to every registered sink.
//!
//! # Delivery
//! - At-most-once, fire-and-forget; nothing is acknowledged
//! - FIFO per subscriber, no ordering across subscribers
//! - A sink that refuses a frame is unregistered on the spot
//! - One failing sink never blocks or fails delivery to the others
//!
//! # Locking
//! The registry lock is held only to mutate it or to copy the sink set.
//! Frames are handed to sinks outside the lock.

pub mod broadcaster;
pub mod guard;
pub mod sink;

pub use broadcaster::{Broadcaster, PublishReport};
pub use guard::{open_channel, SubscriptionGuard};
pub use sink::{ChannelSink, EventSink};

use crate::event::Event;
use std::sync::Arc;

/// Opaque subscriber identity. Allocated monotonically and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Publish/subscribe seam between producers, subscribers and the delivery
/// strategy behind them.
pub trait EventFanout: Send + Sync {
    /// Add a sink to the active set.
    fn register(&self, sink: Arc<dyn EventSink>) -> SubscriptionHandle;

    /// Remove a sink. Unknown or already removed handles are ignored.
    fn unregister(&self, handle: SubscriptionHandle);

    /// Deliver `event` to every registered sink. Never fails.
    fn publish(&self, event: &Event) -> PublishReport;

    fn subscriber_count(&self) -> usize;
}
