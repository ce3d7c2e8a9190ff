// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::collections::HashSet;
use std::path::Path;
use wafwatch::{Event, EventStore};

/// Dashboard-style counters over a set of events.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub total: usize,
    pub blocked: usize,
    pub passed: usize,
    /// Distinct client ips among blocked transactions.
    pub unique_attackers: usize,
    pub rule_hits: usize,
}

pub fn summarize(events: &[Event]) -> StoreSummary {
    let blocked: Vec<&Event> = events.iter().filter(|e| e.is_blocked()).collect();
    let attackers: HashSet<&str> = blocked.iter().filter_map(|e| e.client_ip()).collect();

    StoreSummary {
        total: events.len(),
        blocked: blocked.len(),
        passed: events.len() - blocked.len(),
        unique_attackers: attackers.len(),
        rule_hits: events.iter().map(|e| e.messages().len()).sum(),
    }
}

fn percent(part: usize, total: usize) -> String {
    if total == 0 {
        "0% of total".to_string()
    } else {
        format!("{:.1}% of total", part as f64 * 100.0 / total as f64)
    }
}

pub fn run(log_path: &Path) -> anyhow::Result<()> {
    let store = EventStore::new(log_path);

    println!("\nwafwatch Event Log Report");
    println!("-------------------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Item", "Value", "Details"]);

    let path_str = log_path.display().to_string();
    if !store.exists() {
        table.add_row(vec!["Event log", "MISSING", path_str.as_str()]);
        println!("{table}\n");
        return Ok(());
    }
    table.add_row(vec!["Event log", "FOUND", path_str.as_str()]);

    let report = store.scan()?;
    let summary = summarize(&report.events);

    table.add_row(vec![
        "Events".to_string(),
        summary.total.to_string(),
        format!("{} lines skipped", report.skipped),
    ]);
    table.add_row(vec![
        "Blocked".to_string(),
        summary.blocked.to_string(),
        percent(summary.blocked, summary.total),
    ]);
    table.add_row(vec![
        "Passed".to_string(),
        summary.passed.to_string(),
        percent(summary.passed, summary.total),
    ]);
    table.add_row(vec![
        "Unique attackers".to_string(),
        summary.unique_attackers.to_string(),
        String::new(),
    ]);
    table.add_row(vec![
        "Rule hits".to_string(),
        summary.rule_hits.to_string(),
        String::new(),
    ]);

    println!("{table}\n");
    Ok(())
}
