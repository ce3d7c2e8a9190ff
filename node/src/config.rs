// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use wafwatch::config::{DEFAULT_EVENT_LOG_PATH, DEFAULT_SUBSCRIBER_BUFFER, EVENT_LOG_ENV};

pub const BIND_ENV: &str = "WAFWATCH_BIND";
pub const SUBSCRIBER_BUFFER_ENV: &str = "WAFWATCH_SUBSCRIBER_BUFFER";
pub const KEEPALIVE_ENV: &str = "WAFWATCH_KEEPALIVE_SECS";
pub const CORS_ENV: &str = "WAFWATCH_CORS";

#[derive(Error, Debug)]
#[error("invalid value for {name}: {value:?} ({reason})")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// The one audit log both the backfill routes read.
    pub event_log_path: PathBuf,
    /// Frames a live subscriber may fall behind before it is dropped.
    pub subscriber_buffer: usize,
    /// Keepalive period on live streams. `None` disables keepalives.
    pub keepalive_secs: Option<u64>,
    pub cors_allow_any: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9002)),
            event_log_path: PathBuf::from(DEFAULT_EVENT_LOG_PATH),
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            keepalive_secs: Some(15),
            cors_allow_any: false,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(path) = lookup(EVENT_LOG_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.event_log_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup(BIND_ENV) {
            cfg.bind_addr = parse(BIND_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SUBSCRIBER_BUFFER_ENV) {
            let n: usize = parse(SUBSCRIBER_BUFFER_ENV, &raw)?;
            if n == 0 {
                return Err(invalid(SUBSCRIBER_BUFFER_ENV, &raw, "must be at least 1"));
            }
            cfg.subscriber_buffer = n;
        }
        if let Some(raw) = lookup(KEEPALIVE_ENV) {
            let secs: u64 = parse(KEEPALIVE_ENV, &raw)?;
            cfg.keepalive_secs = (secs > 0).then_some(secs);
        }
        if let Some(raw) = lookup(CORS_ENV) {
            cfg.cors_allow_any = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(invalid(CORS_ENV, &raw, "expected a boolean")),
            };
        }

        Ok(cfg)
    }

    pub fn keepalive(&self) -> Option<Duration> {
        self.keepalive_secs.map(Duration::from_secs)
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(name, raw, &e.to_string()))
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
