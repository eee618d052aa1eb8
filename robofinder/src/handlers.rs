use anyhow::Context;
use clap::ArgMatches;
use robofinder_core::{Console, ScanRequest, ScanSummary, TargetSpec, execute_scan};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{Level, warn};

/// Collect the raw scan parameters from parsed arguments
pub fn request_from_matches(matches: &ArgMatches) -> ScanRequest {
    let defaults = ScanRequest::default();

    ScanRequest {
        url: matches.get_one::<String>("url").cloned().unwrap_or_default(),
        delay_secs: matches
            .get_one::<f64>("delay")
            .copied()
            .unwrap_or(defaults.delay_secs),
        limit: matches
            .get_one::<i64>("limit")
            .copied()
            .unwrap_or(defaults.limit),
        paths: matches.get_flag("paths"),
        sitemaps: matches.get_flag("sm"),
        silent: matches.get_flag("silent"),
        verbose: matches.get_flag("verbose"),
        timeout_secs: matches
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
        verify_tls: matches.get_flag("verify-tls"),
        archive_url: matches.get_one::<String>("archive-url").cloned(),
        output: matches.get_one::<PathBuf>("output").cloned(),
    }
}

/// Most verbose diagnostic level shown for the given output flags.
///
/// Silent runs only surface internal faults; expected failures such as an
/// unreachable archive are logged below `ERROR`.
pub fn log_level(silent: bool, verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else if silent {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Diagnostics go to stderr so stdout stays clean for discoveries
pub fn init_tracing(silent: bool, verbose: bool) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(silent, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Write the run's findings as pretty JSON
pub fn save_summary(summary: &ScanSummary, path: &Path) -> anyhow::Result<()> {
    let json = summary
        .to_json()
        .context("Failed to serialize scan findings")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write findings to {}", path.display()))?;
    Ok(())
}

/// Validate, scan and print. Returns the process exit status and the writer.
pub async fn run_scan<W: Write>(request: ScanRequest, out: W) -> (u8, W) {
    let spec = match TargetSpec::validate(request) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("{}", e);
            return (1, out);
        }
    };

    let mut console = Console::for_target(out, &spec);

    let result = execute_scan(&spec, |event| console.handle(event)).await;
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Archive index request for {} failed: {}", spec.robots_url(), e);
            console.notice("Could not retrieve timestamps from the archive index.");
            console.debug(format!("Request error: {}", e));
            return (1, console.into_inner());
        }
    };

    if let Some(path) = spec.output() {
        if let Err(e) = save_summary(&summary, path) {
            eprintln!("[-] {:#}", e);
            return (1, console.into_inner());
        }
        console.progress(format!("Findings saved to {}", path.display()));
    }

    (0, console.into_inner())
}

pub async fn handle_scan(matches: &ArgMatches) -> u8 {
    let request = request_from_matches(matches);
    init_tracing(request.silent, request.verbose);

    let (status, _) = run_scan(request, std::io::stdout()).await;
    status
}
