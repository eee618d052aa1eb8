// Print gating for scan output

use crate::scan::ScanEvent;
use crate::target::TargetSpec;
use colored::Colorize;
use std::fmt::Display;
use std::io::Write;

/// Writes scan output, honouring the silent, verbose and output-kind flags.
///
/// Discovery lines are written bare so the output can be piped; every other
/// line carries a `[+]`, `[-]` or `[DEBUG]` prefix.
pub struct Console<W: Write> {
    out: W,
    silent: bool,
    verbose: bool,
    show_paths: bool,
    show_sitemaps: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, silent: bool, verbose: bool, show_paths: bool, show_sitemaps: bool) -> Self {
        Self {
            out,
            silent,
            verbose,
            show_paths,
            show_sitemaps,
        }
    }

    pub fn for_target(out: W, spec: &TargetSpec) -> Self {
        Self::new(
            out,
            spec.silent(),
            spec.verbose(),
            spec.want_paths(),
            spec.want_sitemaps(),
        )
    }

    /// `[+]` line, hidden in silent mode
    pub fn progress(&mut self, message: impl Display) {
        if !self.silent {
            self.line(format!("{} {}", "[+]".green().bold(), message));
        }
    }

    /// `[-]` line, hidden in silent mode
    pub fn notice(&mut self, message: impl Display) {
        if !self.silent {
            self.line(format!("{} {}", "[-]".red().bold(), message));
        }
    }

    /// `[DEBUG]` line, shown only in verbose mode
    pub fn debug(&mut self, message: impl Display) {
        if self.verbose && !self.silent {
            self.line(format!("{} {}", "[DEBUG]".dimmed(), message));
        }
    }

    /// Bare discovery line, never suppressed
    pub fn discovery(&mut self, url: &str) {
        self.line(url);
    }

    pub fn handle(&mut self, event: &ScanEvent) {
        match event {
            ScanEvent::TimestampsFound { count } => {
                self.progress(format!("Found [{}] Timestamps.", count));
            }
            ScanEvent::FetchStarted => self.progress("Fetching timestamps"),
            ScanEvent::SnapshotRequested { url, captured_at } => match captured_at {
                Some(at) => self.debug(format!("Getting New Timestamp Data ({}).\n\t{}", at, url)),
                None => self.debug(format!("Getting New Timestamp Data.\n\t{}", url)),
            },
            ScanEvent::SnapshotSkipped { url, error } => {
                self.debug(format!("Error On Request: {}\n\t{}", error, url));
            }
            ScanEvent::NewPath(discovery) => {
                if self.show_paths {
                    self.discovery(&discovery.url);
                }
            }
            ScanEvent::NewSitemap(discovery) => {
                if self.show_sitemaps {
                    self.discovery(&discovery.url);
                }
            }
            ScanEvent::Finished { paths, sitemaps } => {
                if self.show_paths && *paths == 0 {
                    self.notice("No URL was found from robots.txt");
                }
                if self.show_sitemaps && *sitemaps == 0 {
                    self.notice("No sitemap was found from robots.txt");
                }
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl Display) {
        // A closed stdout (e.g. `| head`) must not abort the scan.
        let _ = writeln!(self.out, "{}", text);
    }
}
