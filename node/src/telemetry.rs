// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "wafwatch=debug,wafwatch_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::error!("Failed to install Prometheus recorder: {}", e),
    }

    metrics::describe_counter!("wafwatch_events_ingested_total", "Events accepted by the ingest endpoint");
    metrics::describe_counter!("wafwatch_ingest_rejected_total", "Ingest payloads rejected as invalid JSON");
    metrics::describe_counter!("wafwatch_events_blocked_total", "Ingested events the WAF answered with 403");
    metrics::describe_counter!("wafwatch_frames_delivered_total", "Frames handed to live subscribers");
    metrics::describe_counter!("wafwatch_subscribers_pruned_total", "Subscribers dropped after a failed write");
    metrics::describe_counter!("wafwatch_backfill_requests_total", "Historical backfill requests served");
    metrics::describe_gauge!("wafwatch_subscribers", "Currently registered live subscribers");
    metrics::describe_histogram!("wafwatch_backfill_duration_seconds", "Time taken to scan the audit log");

    metrics::gauge!("wafwatch_node_up", 1.0);
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
