use crate::broadcast::{Broadcaster, ChannelSink, EventFanout, EventSink, PublishReport};
use crate::error::SinkError;
use crate::parser::parse_str;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Sink whose every write fails, counting the attempts.
#[derive(Default)]
struct FailingSink {
    attempts: AtomicUsize,
}

impl EventSink for FailingSink {
    fn deliver(&self, _frame: Bytes) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Closed)
    }
}

/// Sink recording every frame it accepts.
#[derive(Default)]
struct RecordingSink {
    frames: Mutex<Vec<Bytes>>,
}

impl EventSink for RecordingSink {
    fn deliver(&self, frame: Bytes) -> Result<(), SinkError> {
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

const SCENARIO: &str = r#"{"transaction":{"client_ip":"1.2.3.4","messages":[]}}"#;

fn framed(json: &str) -> Bytes {
    Bytes::from(format!("data: {}\n\n", json))
}

#[test]
fn test_fanout_reaches_every_subscriber_once() {
    let broadcaster = Broadcaster::new();
    let sinks: Vec<Arc<RecordingSink>> = (0..5).map(|_| Arc::new(RecordingSink::default())).collect();
    for sink in &sinks {
        broadcaster.register(sink.clone());
    }

    let event = parse_str(SCENARIO).unwrap();
    let report = broadcaster.publish(&event);
    assert_eq!(report, PublishReport { delivered: 5, pruned: 0 });

    for sink in &sinks {
        let frames = sink.frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], framed(SCENARIO));
    }
}

#[test]
fn test_failing_subscriber_is_isolated_and_pruned() {
    let broadcaster = Broadcaster::new();
    let a = Arc::new(FailingSink::default());
    let b = Arc::new(RecordingSink::default());
    let handle_a = broadcaster.register(a.clone());
    let handle_b = broadcaster.register(b.clone());

    let event = parse_str(SCENARIO).unwrap();
    let first = broadcaster.publish(&event);
    assert_eq!(first, PublishReport { delivered: 1, pruned: 1 });
    assert!(!broadcaster.is_registered(handle_a));
    assert!(broadcaster.is_registered(handle_b));

    let second = broadcaster.publish(&event);
    assert_eq!(second, PublishReport { delivered: 1, pruned: 0 });
    assert_eq!(a.attempts.load(Ordering::SeqCst), 1);

    let frames = b.frames.lock().unwrap();
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| *f == framed(SCENARIO)));
}

#[test]
fn test_unregister_is_idempotent() {
    let broadcaster = Broadcaster::new();
    let sink = Arc::new(RecordingSink::default());
    let handle = broadcaster.register(sink.clone());
    let other = broadcaster.register(Arc::new(RecordingSink::default()));

    broadcaster.unregister(handle);
    broadcaster.unregister(handle);
    assert_eq!(broadcaster.subscriber_count(), 1);
    assert!(broadcaster.is_registered(other));

    // A handle from a different registry was never registered here.
    let foreign = Broadcaster::new().register(Arc::new(RecordingSink::default()));
    let foreign = crate::broadcast::SubscriptionHandle::new(foreign.id() + 100);
    broadcaster.unregister(foreign);
    assert_eq!(broadcaster.subscriber_count(), 1);

    broadcaster.publish(&parse_str(SCENARIO).unwrap());
    assert!(sink.frames.lock().unwrap().is_empty());
}

#[test]
fn test_per_subscriber_order_is_publish_order() {
    let broadcaster = Broadcaster::new();
    let (sink, mut rx) = ChannelSink::channel(16);
    broadcaster.register(Arc::new(sink));

    for i in 0..10 {
        let line = format!(r#"{{"transaction":{{"seq":{}}}}}"#, i);
        broadcaster.publish(&parse_str(&line).unwrap());
    }
    for i in 0..10 {
        let frame = rx.try_recv().unwrap();
        assert_eq!(frame, framed(&format!(r#"{{"transaction":{{"seq":{}}}}}"#, i)));
    }
}

#[test]
fn test_lagging_channel_is_pruned_and_stream_ends() {
    let broadcaster = Broadcaster::new();
    let (sink, mut rx) = ChannelSink::channel(1);
    let handle = broadcaster.register(Arc::new(sink));
    let event = parse_str(SCENARIO).unwrap();

    assert_eq!(broadcaster.publish(&event).delivered, 1);
    assert_eq!(broadcaster.publish(&event).pruned, 1);
    assert!(!broadcaster.is_registered(handle));

    // The buffered frame is still readable, then the channel is closed.
    assert!(rx.try_recv().is_ok());
    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::mpsc::error::TryRecvError::Disconnected)
    ));
}

#[test]
fn test_concurrent_register_and_publish() {
    let broadcaster = Arc::new(Broadcaster::new());
    let event = parse_str(SCENARIO).unwrap();

    let publishers: Vec<_> = (0..4)
        .map(|_| {
            let broadcaster = broadcaster.clone();
            let event = event.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    broadcaster.publish(&event);
                }
            })
        })
        .collect();

    let churners: Vec<_> = (0..4)
        .map(|_| {
            let broadcaster = broadcaster.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let handle = broadcaster.register(Arc::new(RecordingSink::default()));
                    broadcaster.unregister(handle);
                }
            })
        })
        .collect();

    for t in publishers.into_iter().chain(churners) {
        t.join().unwrap();
    }
    assert_eq!(broadcaster.subscriber_count(), 0);
}

#[test]
fn test_payload_events_are_framed_verbatim() {
    let broadcaster = Broadcaster::new();
    let sink = Arc::new(RecordingSink::default());
    broadcaster.register(sink.clone());

    let value: serde_json::Value = serde_json::from_str(r#"{"z":1,"a":[true,null]}"#).unwrap();
    broadcaster.publish(&crate::event::Event::from_payload(value));
    assert_eq!(sink.frames.lock().unwrap()[0], framed(r#"{"z":1,"a":[true,null]}"#));
}
