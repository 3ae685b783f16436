use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the Hub'Eau client, the pager and the report writer.
#[derive(Debug, Error)]
pub enum HubeauError {
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network request failed for {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode JSON report")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV report")]
    Csv(#[from] csv::Error),

    #[error("No code_station")]
    MissingStationCode,
}

pub type Result<T, E = HubeauError> = std::result::Result<T, E>;
