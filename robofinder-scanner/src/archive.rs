// CDX timestamp index client

use crate::error::{Result, ScanError};
use crate::result::TimestampEntry;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_CDX_ENDPOINT: &str = "https://web.archive.org/cdx/search/cdx";

pub struct ArchiveIndex {
    client: Client,
    endpoint: String,
}

impl ArchiveIndex {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_CDX_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the index query for `page_url`.
    ///
    /// Only 200 captures are listed, byte-identical neighbours are collapsed by
    /// digest, and a negative `limit` asks for the most recent captures.
    pub fn query_url(&self, page_url: &str, limit: i64) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;

        url.query_pairs_mut()
            .append_pair("url", page_url)
            .append_pair("output", "json")
            .append_pair("filter", "statuscode:200")
            .append_pair("fl", "timestamp,original")
            .append_pair("collapse", "digest")
            .append_pair("limit", &limit.to_string());

        Ok(url)
    }

    pub async fn fetch_timestamps(&self, page_url: &str, limit: i64) -> Result<Vec<TimestampEntry>> {
        let query = self.query_url(page_url, limit)?;
        debug!("Querying archive index: {}", query);

        let response = self.client.get(query).send().await?.error_for_status()?;
        let body = response.text().await?;

        let entries = parse_index_rows(&body)?;
        info!("Archive index listed {} capture(s) of {}", entries.len(), page_url);
        Ok(entries)
    }
}

/// Decode a JSON CDX payload into timestamp entries.
///
/// Row 0 is the field-name header. An empty payload or an empty array means no
/// captures and yields no entries.
pub fn parse_index_rows(body: &str) -> Result<Vec<TimestampEntry>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<String>> = serde_json::from_str(body)?;

    rows.into_iter()
        .enumerate()
        .skip(1)
        .map(|(index, row)| {
            let columns = row.len();
            let mut fields = row.into_iter();
            match (fields.next(), fields.next()) {
                (Some(timestamp), Some(original)) => Ok(TimestampEntry::new(timestamp, original)),
                _ => Err(ScanError::ShortRow { index, columns }),
            }
        })
        .collect()
}
