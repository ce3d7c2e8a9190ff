// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wafwatch::{Event, EventFanout, EventStore};

use crate::api::*;
use crate::config::NodeConfig;
use crate::errors::ApiError;
use crate::stream::SubscriptionStream;

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    pub fanout: Arc<dyn EventFanout>,
    pub store: EventStore,
    pub subscriber_buffer: usize,
    pub keepalive: Option<Duration>,
    /// Cancelled at shutdown; ends every open live stream.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(cfg: &NodeConfig, fanout: Arc<dyn EventFanout>, shutdown: CancellationToken) -> Self {
        Self {
            fanout,
            store: EventStore::new(&cfg.event_log_path),
            subscriber_buffer: cfg.subscriber_buffer,
            keepalive: cfg.keepalive(),
            shutdown,
        }
    }
}

pub fn build_router(state: AppState, cors_allow_any: bool) -> Router {
    let mut app = Router::new()
        // Ingestion
        .route("/api/webhook/logs", post(ingest_event))
        // Live subscription
        .route("/api/logs/stream", get(subscribe_events))
        // Backfill; both paths read the one configured log
        .route("/api/logs", get(historical_events))
        .route("/api/logs/historical", get(historical_events))
        // Observability
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_allow_any {
        tracing::info!("CORS: allowing any origin");
        app = app.layer(CorsLayer::permissive());
    }

    app
}

async fn ingest_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Error processing webhook request: {}", e);
        metrics::increment_counter!("wafwatch_ingest_rejected_total");
        ApiError::InvalidPayload
    })?;

    let event = Event::from_payload(value);
    if !event.is_well_formed() {
        tracing::warn!("Webhook payload has no transaction object, broadcasting as received");
    }
    if event.is_blocked() {
        metrics::increment_counter!("wafwatch_events_blocked_total");
    }

    let report = state.fanout.publish(&event);
    metrics::increment_counter!("wafwatch_events_ingested_total");
    metrics::counter!("wafwatch_frames_delivered_total", report.delivered as u64);
    metrics::counter!("wafwatch_subscribers_pruned_total", report.pruned as u64);

    tracing::debug!(
        client_ip = event.client_ip().unwrap_or("-"),
        rules = event.messages().len(),
        "Log broadcasted to {} subscribers",
        report.delivered
    );

    Ok(Json(IngestResponse {
        success: true,
        message: "Log broadcasted".to_string(),
    }))
}

async fn subscribe_events(State(state): State<AppState>) -> Response {
    let stream = SubscriptionStream::open(
        state.fanout.clone(),
        state.subscriber_buffer,
        state.keepalive,
    );
    tracing::debug!("Live stream opened for {}", stream.handle());

    let shutdown = state.shutdown.clone();
    let body = stream.take_until(async move { shutdown.cancelled().await });

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(body),
    )
        .into_response()
}

async fn historical_events(
    State(state): State<AppState>,
    Query(params): Query<HistoricalParams>,
) -> Result<Json<Vec<Event>>, ApiError> {
    metrics::increment_counter!("wafwatch_backfill_requests_total");
    let started = Instant::now();

    let store = state.store.clone();
    let mut events = tokio::task::spawn_blocking(move || store.read_all())
        .await
        .map_err(|e| {
            tracing::error!("Backfill task failed: {}", e);
            ApiError::Internal
        })??;

    metrics::histogram!("wafwatch_backfill_duration_seconds", started.elapsed().as_secs_f64());

    if let Some(term) = params.q.as_deref() {
        events.retain(|event| event.matches(term));
    }
    if let Some(limit) = params.limit {
        events.truncate(limit);
    }

    Ok(Json(events))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        subscribers: state.fanout.subscriber_count(),
    })
}

/// Subscribers come and go through guard drops and publish-time pruning,
/// so the gauge is sampled from the registry at scrape time.
async fn metrics_handler(State(state): State<AppState>) -> String {
    metrics::gauge!("wafwatch_subscribers", state.fanout.subscriber_count() as f64);
    crate::telemetry::get_metrics()
}
