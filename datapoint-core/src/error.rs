use thiserror::Error;

/// Errors surfaced by the DataPoint client.
///
/// Variants fall into four classes: configuration (caller bug, raised before
/// any I/O), network, parse, and invalid input.
#[derive(Debug, Error)]
pub enum DataPointError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed for {url} with status {status}: {body}")]
    HttpStatus { url: String, status: u16, body: String },

    #[error("Failed to parse JSON from {url}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DataPointError {
    /// Transport failures and non-success statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::HttpStatus { .. })
    }

    /// Bodies that are not JSON, or JSON missing the structure we need.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::MalformedResponse(_))
    }
}

pub type Result<T> = std::result::Result<T, DataPointError>;
