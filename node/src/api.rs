// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
}

/// Query for the backfill routes.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct HistoricalParams {
    /// Search term over client ip, URI, rule ids and rule messages.
    pub q: Option<String>,
    /// Keep only the newest `limit` events.
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub subscribers: usize,
}
