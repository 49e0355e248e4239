//! Tests for the CLI

use super::*;
use crate::config::RetryMode;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write as _;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

fn config_file(base_url: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_key: file-key\nbase_url: {base_url}\nretry: automatic").unwrap();
    file
}

fn lines(out: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ============================================================================
// Argument Parsing
// ============================================================================

#[test]
fn test_parse_search() {
    let cli = parse(&[
        "urlscan",
        "--api-key",
        "k",
        "search",
        "domain:example.com",
        "--limit",
        "5",
        "--datasource",
        "hostnames",
    ]);

    match cli.command {
        Commands::Search {
            query,
            size,
            limit,
            datasource,
            ..
        } => {
            assert_eq!(query, "domain:example.com");
            assert_eq!(size, 100);
            assert_eq!(limit, Some(5));
            assert_eq!(datasource, Some(crate::types::SearchDataSource::Hostnames));
        }
        other => panic!("Expected search, got {other:?}"),
    }
}

#[test]
fn test_parse_scan_requires_url() {
    assert!(Cli::try_parse_from(["urlscan", "scan"]).is_err());

    let cli = parse(&[
        "urlscan",
        "scan",
        "https://a.example",
        "https://b.example",
        "--tag",
        "x",
        "--visibility",
        "unlisted",
        "--wait",
    ]);
    match cli.command {
        Commands::Scan {
            urls,
            tags,
            visibility,
            wait,
            timeout,
            ..
        } => {
            assert_eq!(urls.len(), 2);
            assert_eq!(tags, vec!["x".to_string()]);
            assert_eq!(visibility, crate::types::Visibility::Unlisted);
            assert!(wait);
            assert_eq!(timeout, 60);
        }
        other => panic!("Expected scan, got {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["urlscan", "quotas", "--retry", "automatic", "-v"]);
    assert_eq!(cli.retry, Some(RetryMode::Automatic));
    assert!(cli.verbose);
    assert_eq!(cli.format, OutputFormat::Json);
}

// ============================================================================
// Config Merging
// ============================================================================

#[test]
fn test_config_file_is_loaded() {
    let file = config_file("https://proxy.example");
    let path = file.path().to_str().unwrap();

    let runner = Runner::new(parse(&["urlscan", "--config", path, "quotas"]));
    let config = runner.client_config().unwrap();

    // The environment may provide a key; only check the file values that
    // cannot be overridden from it.
    assert_eq!(config.base_url, "https://proxy.example");
    assert_eq!(config.retry, RetryMode::Automatic);
}

#[test]
fn test_flags_override_config_file() {
    let file = config_file("https://proxy.example");
    let path = file.path().to_str().unwrap();

    let runner = Runner::new(parse(&[
        "urlscan", "--config", path, "--api-key", "flag-key", "--retry", "local", "quotas",
    ]));
    let config = runner.client_config().unwrap();

    assert_eq!(config.api_key.as_deref(), Some("flag-key"));
    assert_eq!(config.retry, RetryMode::Local);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let runner = Runner::new(parse(&["urlscan", "--config", "/nonexistent/urlscan.yaml", "quotas"]));
    assert!(runner.client_config().is_err());
}

// ============================================================================
// Commands
// ============================================================================

#[tokio::test]
async fn test_search_writes_json_lines() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search/"))
        .and(query_param("q", "page.domain:example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"_id": "a", "sort": [2, "a"]},
                {"_id": "b", "sort": [1, "b"]},
            ],
            "total": 2,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = config_file(&server.uri());
    let runner = Runner::new(parse(&[
        "urlscan",
        "--config",
        file.path().to_str().unwrap(),
        "search",
        "page.domain:example.com",
    ]));

    let mut out = Vec::new();
    runner.run_with(&mut out).await.unwrap();

    let results = lines(&out);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["_id"], "a");
    assert_eq!(results[1]["_id"], "b");
}

#[tokio::test]
async fn test_scan_reports_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/scan/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "DNS Error - Could not resolve domain",
            "status": 400,
        })))
        .mount(&server)
        .await;

    let file = config_file(&server.uri());
    let runner = Runner::new(parse(&[
        "urlscan",
        "--config",
        file.path().to_str().unwrap(),
        "scan",
        "https://nx.example",
    ]));

    let mut out = Vec::new();
    let err = runner.run_with(&mut out).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let results = lines(&out);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["url"], "https://nx.example");
}

#[tokio::test]
async fn test_screenshot_is_written_to_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/screenshots/abc.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("shot.png");
    let file = config_file(&server.uri());
    let runner = Runner::new(parse(&[
        "urlscan",
        "--config",
        file.path().to_str().unwrap(),
        "screenshot",
        "abc",
        "--output",
        target.to_str().unwrap(),
    ]));

    let mut out = Vec::new();
    runner.run_with(&mut out).await.unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), vec![0x89, b'P', b'N', b'G']);
    assert_eq!(lines(&out)[0]["bytes"], 4);
}
