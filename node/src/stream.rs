// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Live subscription body.
//!
//! Connection lifecycle: CONNECTING -> OPEN -> CLOSED.
//! - OPEN once the sink is registered (the guard exists)
//! - CLOSED when the sink is pruned (channel ends) or the body is dropped
//!   because the peer went away; dropping the guard unregisters the sink

use axum::body::Bytes;
use futures::Stream;
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use wafwatch::config::KEEPALIVE_FRAME;
use wafwatch::{open_channel, EventFanout, SubscriptionGuard, SubscriptionHandle};

pub struct SubscriptionStream {
    frames: mpsc::Receiver<Bytes>,
    keepalive: Option<Interval>,
    guard: SubscriptionGuard,
}

impl SubscriptionStream {
    /// Register a new subscriber with `fanout` and stream its frames.
    pub fn open(fanout: Arc<dyn EventFanout>, buffer: usize, keepalive: Option<Duration>) -> Self {
        let (guard, frames) = open_channel(fanout, buffer);
        let keepalive = keepalive.map(|period| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        Self {
            frames,
            keepalive,
            guard,
        }
    }

    pub fn handle(&self) -> SubscriptionHandle {
        self.guard.handle()
    }
}

impl Stream for SubscriptionStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match this.frames.poll_recv(cx) {
            Poll::Ready(Some(frame)) => return Poll::Ready(Some(Ok(frame))),
            // Sink pruned: the registry dropped the sending half.
            Poll::Ready(None) => return Poll::Ready(None),
            Poll::Pending => {}
        }

        if let Some(keepalive) = this.keepalive.as_mut() {
            if keepalive.poll_tick(cx).is_ready() {
                return Poll::Ready(Some(Ok(Bytes::from_static(KEEPALIVE_FRAME))));
            }
        }

        Poll::Pending
    }
}

impl Drop for SubscriptionStream {
    fn drop(&mut self) {
        tracing::debug!("Live stream for {} closed", self.guard.handle());
    }
}
