// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-memory broadcaster.

use super::{EventFanout, EventSink, SubscriptionHandle};
use crate::event::Event;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Outcome of one publish. Informational only, never an error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    /// Sinks that accepted the frame.
    pub delivered: usize,
    /// Sinks that refused it and were unregistered.
    pub pruned: usize,
}

/// Process-local subscriber registry with fire-and-forget delivery.
///
/// Subscribers connected to another process never see this process's events.
#[derive(Default)]
pub struct Broadcaster {
    sinks: Mutex<HashMap<SubscriptionHandle, Arc<dyn EventSink>>>,
    next_id: AtomicU64,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn sinks(&self) -> MutexGuard<'_, HashMap<SubscriptionHandle, Arc<dyn EventSink>>> {
        // Sinks are plain handles; a panic elsewhere cannot leave the map half-updated.
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_registered(&self, handle: SubscriptionHandle) -> bool {
        self.sinks().contains_key(&handle)
    }
}

impl EventFanout for Broadcaster {
    fn register(&self, sink: Arc<dyn EventSink>) -> SubscriptionHandle {
        let handle = SubscriptionHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let total = {
            let mut sinks = self.sinks();
            sinks.insert(handle, sink);
            sinks.len()
        };
        tracing::info!("Subscriber {} connected. Total subscribers: {}", handle, total);
        handle
    }

    fn unregister(&self, handle: SubscriptionHandle) {
        let (removed, total) = {
            let mut sinks = self.sinks();
            let removed = sinks.remove(&handle).is_some();
            (removed, sinks.len())
        };
        if removed {
            tracing::info!("Subscriber {} disconnected. Total subscribers: {}", handle, total);
        }
    }

    fn publish(&self, event: &Event) -> PublishReport {
        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Dropping event, failed to encode frame: {}", e);
                return PublishReport::default();
            }
        };

        let snapshot: Vec<(SubscriptionHandle, Arc<dyn EventSink>)> = self
            .sinks()
            .iter()
            .map(|(handle, sink)| (*handle, Arc::clone(sink)))
            .collect();

        let mut report = PublishReport::default();
        let mut failed = Vec::new();
        for (handle, sink) in snapshot {
            match sink.deliver(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to send event to subscriber {}, removing it: {}", handle, e);
                    failed.push(handle);
                }
            }
        }

        if !failed.is_empty() {
            let mut sinks = self.sinks();
            for handle in &failed {
                if sinks.remove(handle).is_some() {
                    report.pruned += 1;
                }
            }
            tracing::info!("Pruned {} subscribers. Total subscribers: {}", report.pruned, sinks.len());
        }

        tracing::debug!(
            "Published event to {} subscribers ({} pruned)",
            report.delivered,
            report.pruned
        );
        report
    }

    fn subscriber_count(&self) -> usize {
        self.sinks().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::ChannelSink;
    use crate::parser::parse_str;

    #[test]
    fn test_handles_are_not_reused() {
        let broadcaster = Broadcaster::new();
        let (sink, _rx) = ChannelSink::channel(1);
        let a = broadcaster.register(Arc::new(sink.clone()));
        broadcaster.unregister(a);
        let b = broadcaster.register(Arc::new(sink));
        assert_ne!(a, b);
        assert!(!broadcaster.is_registered(a));
        assert!(broadcaster.is_registered(b));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let broadcaster = Broadcaster::new();
        let event = parse_str(r#"{"transaction":{}}"#).unwrap();
        assert_eq!(broadcaster.publish(&event), PublishReport::default());
    }
}
