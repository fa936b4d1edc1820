use crate::record::EventKind;

/// Error returned when a [`crate::client::Client`] cannot be constructed.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("api url is required (set `api_url` or OMNIPULSE_URL)")]
    MissingApiUrl,

    #[error("ingest key is required (set `ingest_key` or OMNIPULSE_INGEST_KEY)")]
    MissingIngestKey,

    #[error("client must be started from within a tokio runtime")]
    NoRuntime,

    #[cfg(feature = "http")]
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// A single failed delivery attempt. The batch it carried is gone.
#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error("failed to marshal payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to compress payload: {0}")]
    Compress(#[from] std::io::Error),

    #[cfg(feature = "http")]
    #[error("failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// The last delivery failure observed during one flush.
///
/// Other kinds in the same flush may have been delivered; the records
/// counted here were dropped.
#[derive(thiserror::Error, Debug)]
#[error("failed to send {records} {kind}: {source}")]
pub struct FlushError {
    pub kind: EventKind,
    pub records: usize,
    #[source]
    pub source: SendError,
}
