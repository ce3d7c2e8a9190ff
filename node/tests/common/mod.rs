#![allow(dead_code)]
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wafwatch::Broadcaster;
use wafwatch_node::config::NodeConfig;
use wafwatch_node::server::{build_router, AppState};

pub struct TestNode {
    pub app: Router,
    pub broadcaster: Arc<Broadcaster>,
    pub shutdown: CancellationToken,
}

pub fn test_node(event_log: &Path) -> TestNode {
    let config = NodeConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        event_log_path: event_log.to_path_buf(),
        subscriber_buffer: 16,
        keepalive_secs: None,
        ..Default::default()
    };
    let broadcaster = Arc::new(Broadcaster::new());
    let shutdown = CancellationToken::new();
    let state = AppState::new(&config, broadcaster.clone(), shutdown.clone());
    TestNode {
        app: build_router(state, false),
        broadcaster,
        shutdown,
    }
}
