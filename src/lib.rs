// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! wafwatch: ingestion and fan-out core for ModSecurity audit events.
//!
//! - [`parser`] decodes one audit line into an [`Event`]
//! - [`store`] replays the append-only audit log newest-first
//! - [`broadcast`] pushes every published event to all live subscribers

pub mod config;
pub mod error;
pub mod event;
pub mod parser;
pub mod store;
pub mod broadcast;

pub use broadcast::{
    open_channel, Broadcaster, ChannelSink, EventFanout, EventSink, PublishReport,
    SubscriptionGuard, SubscriptionHandle,
};
pub use error::{EventError, ParseError, SinkError, StoreError};
pub use event::{Event, RuleDetails, RuleMessage};
pub use store::{EventStore, ScanReport};

#[cfg(test)]
pub mod tests;
