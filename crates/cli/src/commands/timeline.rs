// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use chrono::NaiveDateTime;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;
use wafwatch::{Event, EventStore};

/// ModSecurity's audit `time_stamp`, e.g. `Mon Jun 10 10:00:00 2024`.
const AUDIT_TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Render an audit timestamp as ISO-8601, or pass it through if unrecognized.
pub fn format_time_stamp(raw: &str) -> String {
    let squeezed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&squeezed, AUDIT_TIME_FORMAT)
        .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Newest-first events, filtered by `query` and cut to `limit`.
pub fn select(events: Vec<Event>, query: Option<&str>, limit: Option<usize>) -> Vec<Event> {
    let mut selected: Vec<Event> = match query {
        Some(term) => events.into_iter().filter(|e| e.matches(term)).collect(),
        None => events,
    };
    if let Some(limit) = limit {
        selected.truncate(limit);
    }
    selected
}

pub fn run(log_path: &Path, query: Option<&str>, limit: Option<usize>) -> anyhow::Result<()> {
    let events = select(EventStore::new(log_path).read_all()?, query, limit);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Time", "Client", "Request", "Status", "Rules"]);

    for event in &events {
        let request = format!(
            "{} {}",
            event.method().unwrap_or("-"),
            event.uri().unwrap_or("-")
        );
        let rules = event
            .messages()
            .iter()
            .map(|m| m.details.rule_id.clone())
            .filter(|id| !id.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            event.time_stamp().map(format_time_stamp).unwrap_or_default(),
            event.client_ip().unwrap_or("-").to_string(),
            request,
            event.http_code().map(|c| c.to_string()).unwrap_or_default(),
            rules,
        ]);
    }

    println!("\nEvent Timeline (newest first, {} events)\n", events.len());
    println!("{table}\n");

    Ok(())
}
