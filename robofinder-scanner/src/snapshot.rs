// Archived capture replay

use crate::error::Result;
use crate::result::{Snapshot, TimestampEntry};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_REPLAY_BASE: &str = "http://web.archive.org/web";

pub struct SnapshotFetcher {
    client: Client,
    replay_base: String,
}

impl SnapshotFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            replay_base: DEFAULT_REPLAY_BASE.to_string(),
        }
    }

    pub fn with_replay_base(mut self, replay_base: impl Into<String>) -> Self {
        self.replay_base = replay_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Replay URL for a capture. `if_` asks the archive for the raw capture
    /// without its toolbar or link rewriting.
    pub fn snapshot_url(&self, entry: &TimestampEntry) -> String {
        format!("{}/{}if_/{}", self.replay_base, entry.timestamp, entry.original)
    }

    /// Sleep for `delay`, then download the capture.
    ///
    /// The delay applies to every call. Errors are per capture and callers are
    /// expected to skip the entry rather than abort.
    pub async fn fetch_snapshot(&self, entry: &TimestampEntry, delay: Duration) -> Result<Snapshot> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let url = self.snapshot_url(entry);
        debug!("Fetching snapshot {}", url);

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;

        Ok(Snapshot {
            entry: entry.clone(),
            url,
            body,
        })
    }
}
