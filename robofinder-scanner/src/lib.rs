pub mod archive;
pub mod error;
pub mod extractor;
pub mod http;
pub mod result;
pub mod snapshot;

pub use archive::ArchiveIndex;
pub use error::ScanError;
pub use extractor::{Extraction, LineExtractor, Registers, SeenSet};
pub use http::HttpOptions;
pub use result::{Snapshot, TimestampEntry};
pub use snapshot::SnapshotFetcher;
