//! End-to-end artifact tests: targets file in, report directory out.
//!
//! Every target carries a mock response, so nothing touches the network.

use std::fs;
use std::time::Duration;
use torscout::loader::{load_targets, TargetFormat};
use torscout::output::{self, CONTENT_DIR, CSV_REPORT, HTML_REPORT, JSON_REPORT, SUMMARY_REPORT, TEXT_REPORT};
use torscout::scanner::{FetchConfig, HttpFetcher, NoProgress, ScanOptions, ScanOrchestrator};
use torscout::types::{FetchOutcome, ReportBuilder, Target};

const TARGETS_YAML: &str = r#"
targets:
  - url: "http://market.onion/"
    name: "Market"
    type: "marketplace"
    mock_response: "<html>market</html>"
  - url: "forum.onion/board/1"
    name: "Forum"
    mock_response: "<html>forum</html>"
"#;

async fn scan_yaml(dir: &std::path::Path) -> torscout::ScanReport {
    let targets_file = dir.join("targets.yaml");
    fs::write(&targets_file, TARGETS_YAML).unwrap();

    let loaded = load_targets(&targets_file).unwrap();
    assert_eq!(loaded.format, TargetFormat::Structured);

    let fetcher = HttpFetcher::new(reqwest::Client::new(), FetchConfig::default());
    ScanOrchestrator::new(&fetcher, ScanOptions::default().with_pacing_delay(Duration::ZERO))
        .with_progress(&NoProgress)
        .run(loaded.targets)
        .await
}

#[tokio::test]
async fn test_full_artifact_set() {
    let dir = tempfile::tempdir().unwrap();
    let report = scan_yaml(dir.path()).await;
    let out = dir.path().join("output");

    let saved = output::save_report(&report, &out).unwrap();

    for name in [JSON_REPORT, TEXT_REPORT, CSV_REPORT, HTML_REPORT, SUMMARY_REPORT] {
        assert!(out.join(name).is_file(), "{} missing", name);
    }
    assert_eq!(saved.contents.len(), 2);

    let market = fs::read_to_string(out.join(CONTENT_DIR).join("market.onion.html")).unwrap();
    assert_eq!(market, "<html>market</html>");
    let forum = fs::read_to_string(out.join(CONTENT_DIR).join("forum.onion_board_1.html")).unwrap();
    assert_eq!(forum, "<html>forum</html>");
}

#[tokio::test]
async fn test_json_report_round_trips_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let report = scan_yaml(dir.path()).await;
    output::save_report(&report, dir.path()).unwrap();

    let reloaded = output::load_report(&dir.path().join(JSON_REPORT)).unwrap();
    assert_eq!(reloaded, report);

    let first = &reloaded.outcomes()[0];
    assert_eq!(first.label.as_deref(), Some("Market"));
    assert_eq!(first.target_kind.as_deref(), Some("marketplace"));
    assert_eq!(reloaded.success_count(), 2);
}

#[test]
fn test_csv_report_lists_failures() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ReportBuilder::start();
    let target = Target::new("gone.onion").unwrap();
    builder.record(FetchOutcome::request_failed(
        &target,
        chrono::Utc::now(),
        "Request failed: general SOCKS server failure",
    ));
    let report = builder.finish(false);

    let saved = output::save_report(&report, dir.path()).unwrap();
    assert!(saved.contents.is_empty());
    assert!(!dir.path().join(CONTENT_DIR).exists());

    let mut rdr = csv::Reader::from_path(dir.path().join(CSV_REPORT)).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["URL", "Status", "HTTP_Code", "Timestamp", "Content_Size", "Error"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "FAILED");
    assert_eq!(&rows[0][4], "0");
    assert_eq!(&rows[0][5], "Request failed: general SOCKS server failure");
}

#[test]
fn test_cancelled_report_is_marked() {
    let dir = tempfile::tempdir().unwrap();
    let report = ReportBuilder::start().finish(true);

    output::save_report(&report, dir.path()).unwrap();

    let json = fs::read_to_string(dir.path().join(JSON_REPORT)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["cancelled"], true);
    assert_eq!(value["total_urls"], 0);

    let text = fs::read_to_string(dir.path().join(TEXT_REPORT)).unwrap();
    assert!(text.contains("Cancelled:        yes"));
}
