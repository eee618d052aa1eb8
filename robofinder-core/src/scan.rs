use crate::target::TargetSpec;
use chrono::NaiveDateTime;
use robofinder_scanner::error::Result;
use robofinder_scanner::{ArchiveIndex, LineExtractor, Registers, SnapshotFetcher};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What a discovered entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryKind {
    Path,
    Sitemap,
}

/// A canonical entry together with the capture that first revealed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discovery {
    pub kind: DiscoveryKind,
    pub url: String,
    pub timestamp: String,
}

/// Progress notifications emitted while a scan runs, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    TimestampsFound {
        count: usize,
    },
    FetchStarted,
    SnapshotRequested {
        url: String,
        captured_at: Option<NaiveDateTime>,
    },
    SnapshotSkipped {
        url: String,
        error: String,
    },
    NewPath(Discovery),
    NewSitemap(Discovery),
    Finished {
        paths: usize,
        sitemaps: usize,
    },
}

/// Outcome of one scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub target: String,
    pub base_domain: String,
    pub timestamps: usize,
    pub snapshots_fetched: usize,
    pub snapshots_skipped: usize,
    pub paths: Vec<String>,
    pub sitemaps: Vec<String>,
    pub discoveries: Vec<Discovery>,
}

impl ScanSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the index phase followed by the snapshot phase
pub struct Scanner {
    index: ArchiveIndex,
    fetcher: SnapshotFetcher,
    extractor: LineExtractor,
}

impl Scanner {
    pub fn new(index: ArchiveIndex, fetcher: SnapshotFetcher) -> Self {
        Self {
            index,
            fetcher,
            extractor: LineExtractor::new(),
        }
    }

    /// Build a scanner using the target's client options and archive endpoints
    pub fn for_target(spec: &TargetSpec) -> Result<Self> {
        let client = spec.http_options().build_client()?;
        let endpoints = spec.endpoints();

        let index = ArchiveIndex::new(client.clone()).with_endpoint(endpoints.cdx.clone());
        let fetcher = SnapshotFetcher::new(client).with_replay_base(endpoints.replay.clone());

        Ok(Self::new(index, fetcher))
    }

    /// Scan every listed capture of the target's robots.txt.
    ///
    /// An index failure aborts the scan. A failed capture is reported as
    /// [`ScanEvent::SnapshotSkipped`] and the loop moves on. Captures are
    /// fetched one at a time, each after the target's delay.
    pub async fn run<F>(&self, spec: &TargetSpec, mut on_event: F) -> Result<ScanSummary>
    where
        F: FnMut(&ScanEvent),
    {
        let target = spec.robots_url();
        let entries = self.index.fetch_timestamps(&target, spec.limit()).await?;

        on_event(&ScanEvent::TimestampsFound {
            count: entries.len(),
        });

        let mut summary = ScanSummary {
            target,
            base_domain: spec.base_domain().to_string(),
            timestamps: entries.len(),
            ..Default::default()
        };
        let mut registers = Registers::default();

        on_event(&ScanEvent::FetchStarted);

        for entry in &entries {
            on_event(&ScanEvent::SnapshotRequested {
                url: self.fetcher.snapshot_url(entry),
                captured_at: entry.captured_at(),
            });

            let snapshot = match self.fetcher.fetch_snapshot(entry, spec.delay()).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Skipping capture {}: {}", entry.timestamp, e);
                    summary.snapshots_skipped += 1;
                    on_event(&ScanEvent::SnapshotSkipped {
                        url: self.fetcher.snapshot_url(entry),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            summary.snapshots_fetched += 1;

            let extraction = self
                .extractor
                .extract(&snapshot.body, spec.base_domain(), &mut registers);
            debug!(
                "Capture {} added {} path(s) and {} sitemap(s)",
                entry.timestamp,
                extraction.new_paths.len(),
                extraction.new_sitemaps.len()
            );

            for url in extraction.new_paths {
                let discovery = Discovery {
                    kind: DiscoveryKind::Path,
                    url,
                    timestamp: entry.timestamp.clone(),
                };
                on_event(&ScanEvent::NewPath(discovery.clone()));
                summary.discoveries.push(discovery);
            }

            for url in extraction.new_sitemaps {
                let discovery = Discovery {
                    kind: DiscoveryKind::Sitemap,
                    url,
                    timestamp: entry.timestamp.clone(),
                };
                on_event(&ScanEvent::NewSitemap(discovery.clone()));
                summary.discoveries.push(discovery);
            }
        }

        on_event(&ScanEvent::Finished {
            paths: registers.paths.len(),
            sitemaps: registers.sitemaps.len(),
        });

        info!(
            "Scan of {} complete: {} fetched, {} skipped, {} path(s), {} sitemap(s)",
            summary.target,
            summary.snapshots_fetched,
            summary.snapshots_skipped,
            registers.paths.len(),
            registers.sitemaps.len()
        );

        summary.paths = registers.paths.into_vec();
        summary.sitemaps = registers.sitemaps.into_vec();
        Ok(summary)
    }
}

/// Build a scanner for `spec` and run it
pub async fn execute_scan<F>(spec: &TargetSpec, on_event: F) -> Result<ScanSummary>
where
    F: FnMut(&ScanEvent),
{
    let scanner = Scanner::for_target(spec)?;
    scanner.run(spec, on_event).await
}
