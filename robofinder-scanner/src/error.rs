use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to decode index response: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Index row {index} has {columns} column(s), expected at least 2")]
    ShortRow { index: usize, columns: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
