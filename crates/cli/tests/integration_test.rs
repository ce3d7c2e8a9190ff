use std::io::Write;
use tempfile::tempdir;
use wafwatch::EventStore;
use wafwatch_cli::commands::inspect::{self, StoreSummary};
use wafwatch_cli::commands::timeline;

const LINES: &[&str] = &[
    r#"{"transaction":{"client_ip":"10.0.0.1","time_stamp":"Mon Jun 10 10:00:00 2024","request":{"method":"GET","uri":"/"},"response":{"http_code":200},"messages":[]}}"#,
    r#"{"transaction":{"client_ip":"10.0.0.2","request":{"method":"GET","uri":"/?q=<script>"},"response":{"http_code":403},"messages":[{"message":"XSS Attack Detected","details":{"ruleId":"941100"}},{"message":"Inbound Anomaly Score Exceeded","details":{"ruleId":"949110"}}]}}"#,
    "garbage",
    r#"{"transaction":{"client_ip":"10.0.0.2","request":{"method":"POST","uri":"/login"},"response":{"http_code":403},"messages":[{"message":"SQL Injection","details":{"ruleId":"942100"}}]}}"#,
];

fn write_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("audit.log");
    let mut file = std::fs::File::create(&path).unwrap();
    for line in LINES {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

#[test]
fn test_inspect_workflow() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path());

    assert!(inspect::run(&path).is_ok());
    assert!(inspect::run(&dir.path().join("missing.log")).is_ok());

    let events = EventStore::new(&path).read_all().unwrap();
    assert_eq!(
        inspect::summarize(&events),
        StoreSummary {
            total: 3,
            blocked: 2,
            passed: 1,
            unique_attackers: 1,
            rule_hits: 3,
        }
    );
}

#[test]
fn test_timeline_selection() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path());

    assert!(timeline::run(&path, None, None).is_ok());
    assert!(timeline::run(&path, Some("xss"), Some(1)).is_ok());

    let events = EventStore::new(&path).read_all().unwrap();
    let selected = timeline::select(events.clone(), Some("94"), None);
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].uri(), Some("/login"));

    let newest = timeline::select(events, None, Some(1));
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].method(), Some("POST"));
}

#[test]
fn test_timeline_on_unreadable_log_fails() {
    let dir = tempdir().unwrap();
    assert!(timeline::run(dir.path(), None, None).is_err());
}
