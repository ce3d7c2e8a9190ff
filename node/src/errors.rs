// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use wafwatch::StoreError;
use crate::config::ConfigError;

/// Failure of a single request. Never affects other requests or subscribers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON body")]
    InvalidPayload,
    #[error("Event log error: {0}")]
    Store(#[from] StoreError),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidPayload => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": "Invalid JSON body" })),
            )
                .into_response(),
            ApiError::Store(e) => {
                tracing::error!("Failed to fetch logs: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Error fetching logs" })),
                )
                    .into_response()
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

/// Startup failures of the node process.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
