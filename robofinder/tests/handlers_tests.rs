use robofinder::handlers::*;
use robofinder::{command_argument_builder, normalize_args};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn parse(args: &[&str]) -> robofinder::ScanRequest {
    let mut argv = vec!["robofinder"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(normalize_args(argv))
        .unwrap();
    request_from_matches(&matches)
}

async fn run(args: &[&str]) -> (u8, String) {
    colored::control::set_override(false);
    let (status, out) = run_scan(parse(args), Vec::new()).await;
    (status, String::from_utf8(out).unwrap())
}

/// In-memory sink for a test-scoped tracing subscriber
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

async fn failing_archive() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

async fn archive_with(captures: &[(&str, &str)]) -> MockServer {
    let server = MockServer::start().await;

    let mut rows = vec![r#"["timestamp","original"]"#.to_string()];
    for (ts, _) in captures {
        rows.push(format!(r#"["{}","http://example.com/robots.txt"]"#, ts));
    }

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("[{}]", rows.join(","))))
        .mount(&server)
        .await;

    for (ts, body) in captures {
        Mock::given(method("GET"))
            .and(path(format!("/web/{}if_/http://example.com/robots.txt", ts)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(&server)
            .await;
    }

    server
}

// ============================================================================
// Argument Parsing
// ============================================================================

#[test]
fn test_defaults_from_empty_command_line() {
    let request = parse(&[]);
    assert_eq!(request.url, "");
    assert_eq!(request.delay_secs, 0.5);
    assert_eq!(request.limit, 10);
    assert!(!request.paths);
    assert!(!request.sitemaps);
    assert!(!request.silent);
    assert!(!request.verbose);
    assert_eq!(request.timeout_secs, 30);
    assert!(!request.verify_tls);
    assert!(request.archive_url.is_none());
    assert!(request.output.is_none());
}

#[test]
fn test_single_dash_sm_flag() {
    let request = parse(&["-u", "https://example.com", "-sm"]);
    assert!(request.sitemaps);
    assert!(!request.silent);
}

#[test]
fn test_long_sitemap_spellings() {
    assert!(parse(&["--sm"]).sitemaps);
    assert!(parse(&["--sitemaps"]).sitemaps);
}

#[test]
fn test_negative_limit_and_fractional_delay() {
    let request = parse(&["-u", "https://example.com", "-l", "-5", "-d", "1.5", "-p"]);
    assert_eq!(request.limit, -5);
    assert_eq!(request.delay_secs, 1.5);
    assert!(request.paths);
}

#[test]
fn test_extra_options() {
    let request = parse(&[
        "-u",
        "https://example.com",
        "-p",
        "--timeout",
        "0",
        "--verify-tls",
        "--archive-url",
        "http://127.0.0.1:8080",
        "-o",
        "findings.json",
    ]);
    assert_eq!(request.timeout_secs, 0);
    assert!(request.verify_tls);
    assert_eq!(request.archive_url.as_deref(), Some("http://127.0.0.1:8080"));
    assert_eq!(request.output, Some(PathBuf::from("findings.json")));
}

#[test]
fn test_normalize_args_leaves_other_flags_alone() {
    let args = normalize_args(["robofinder", "-s", "-sm", "-smx"]);
    assert_eq!(args, vec!["robofinder", "-s", "--sm", "-smx"]);
}

// ============================================================================
// Validation Exits
// ============================================================================

#[tokio::test]
async fn test_silent_with_verbose_exits_1() {
    let (status, output) = run(&["-u", "https://example.com", "-p", "-s", "-v"]).await;
    assert_eq!(status, 1);
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_no_output_kind_exits_1() {
    let (status, output) = run(&["-u", "https://example.com"]).await;
    assert_eq!(status, 1);
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_missing_url_exits_1() {
    let (status, _) = run(&["-p"]).await;
    assert_eq!(status, 1);
}

#[tokio::test]
async fn test_url_with_path_exits_1() {
    let (status, _) = run(&["-u", "https://example.com/a/b", "-p"]).await;
    assert_eq!(status, 1);
}

// ============================================================================
// End to End
// ============================================================================

#[tokio::test]
async fn test_paths_run_prints_discoveries() {
    let server = archive_with(&[
        ("20150101000000", "User-agent: *\nDisallow: /admin\n"),
        ("20200101000000", "User-agent: *\nDisallow: /admin\nAllow: /api\n"),
    ])
    .await;
    let archive = server.uri();

    let (status, output) = run(&[
        "-u",
        "http://example.com",
        "-p",
        "-d",
        "0",
        "--archive-url",
        archive.as_str(),
    ])
    .await;

    assert_eq!(status, 0);
    assert_eq!(
        output,
        "[+] Found [2] Timestamps.\n\
         [+] Fetching timestamps\n\
         http://example.com/admin\n\
         http://example.com/api\n"
    );
}

#[tokio::test]
async fn test_silent_run_prints_only_urls() {
    let server = archive_with(&[(
        "20150101000000",
        "Sitemap: http://example.com/sitemap.xml\nDisallow: /private\n",
    )])
    .await;
    let archive = server.uri();

    let (status, output) = run(&[
        "-u",
        "http://example.com/",
        "-sm",
        "-s",
        "-d",
        "0",
        "--archive-url",
        archive.as_str(),
    ])
    .await;

    assert_eq!(status, 0);
    assert_eq!(output, "http://example.com/sitemap.xml\n");
}

#[tokio::test]
async fn test_empty_index_reports_nothing_found() {
    let server = archive_with(&[]).await;
    let archive = server.uri();

    let (status, output) = run(&[
        "-u",
        "http://example.com",
        "-p",
        "-sm",
        "-d",
        "0",
        "--archive-url",
        archive.as_str(),
    ])
    .await;

    assert_eq!(status, 0);
    assert!(output.contains("[+] Found [0] Timestamps."));
    assert!(output.contains("[-] No URL was found from robots.txt"));
    assert!(output.contains("[-] No sitemap was found from robots.txt"));
}

#[tokio::test]
async fn test_index_failure_exits_1() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    let archive = server.uri();

    let (status, output) = run(&[
        "-u",
        "http://example.com",
        "-p",
        "-v",
        "--archive-url",
        archive.as_str(),
    ])
    .await;

    assert_eq!(status, 1);
    assert!(output.contains("[-] Could not retrieve timestamps from the archive index."));
    assert!(output.contains("[DEBUG] Request error: Failed to decode index response"));
}

#[tokio::test]
async fn test_findings_are_saved_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let server = archive_with(&[(
        "20150101000000",
        "Disallow: /admin\nSitemap: http://example.com/sitemap.xml\n",
    )])
    .await;
    let archive = server.uri();
    let file = NamedTempFile::new()?;
    let file_path = file.path().to_string_lossy().to_string();

    let (status, output) = run(&[
        "-u",
        "http://example.com",
        "-p",
        "-sm",
        "-d",
        "0",
        "--archive-url",
        archive.as_str(),
        "-o",
        file_path.as_str(),
    ])
    .await;

    assert_eq!(status, 0);
    assert!(output.contains("[+] Findings saved to"));

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(file.path())?)?;
    assert_eq!(saved["paths"][0], "http://example.com/admin");
    assert_eq!(saved["sitemaps"][0], "http://example.com/sitemap.xml");
    assert_eq!(saved["timestamps"], 1);

    Ok(())
}

#[tokio::test]
async fn test_unwritable_findings_path_exits_1() {
    let server = archive_with(&[("20150101000000", "Disallow: /admin\n")]).await;
    let archive = server.uri();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("out.json");
    let missing = missing.to_string_lossy().to_string();

    let (status, output) = run(&[
        "-u",
        "http://example.com",
        "-p",
        "-d",
        "0",
        "--archive-url",
        archive.as_str(),
        "-o",
        missing.as_str(),
    ])
    .await;

    assert_eq!(status, 1);
    assert!(output.contains("http://example.com/admin"));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_log_levels_follow_output_flags() {
    assert_eq!(log_level(false, true), tracing::Level::DEBUG);
    assert_eq!(log_level(true, false), tracing::Level::ERROR);
    assert_eq!(log_level(false, false), tracing::Level::WARN);
}

#[tokio::test]
async fn test_silent_index_failure_writes_nothing() {
    let server = failing_archive().await;
    let archive = server.uri();

    let log = CapturedLog::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level(true, false))
        .with_writer({
            let log = log.clone();
            move || log.clone()
        })
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (status, output) = run(&[
        "-u",
        "http://example.com",
        "-p",
        "-s",
        "--archive-url",
        archive.as_str(),
    ])
    .await;

    assert_eq!(status, 1);
    assert!(output.is_empty());
    assert_eq!(log.contents(), "");
}

#[tokio::test]
async fn test_index_failure_is_logged_outside_silent_mode() {
    let server = failing_archive().await;
    let archive = server.uri();

    let log = CapturedLog::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level(false, false))
        .with_ansi(false)
        .with_writer({
            let log = log.clone();
            move || log.clone()
        })
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (status, output) = run(&["-u", "http://example.com", "-p", "--archive-url", archive.as_str()]).await;

    assert_eq!(status, 1);
    assert!(output.contains("[-] Could not retrieve timestamps from the archive index."));
    assert!(log.contents().contains("Archive index request for http://example.com/robots.txt failed"));
}
