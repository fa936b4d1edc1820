/// Environment variable names consulted when the explicit configuration
/// leaves the endpoint or credential unset.
///
/// These are purely fallbacks; every other setting comes from
/// [`crate::config::ClientConfig`] only.

/// Base URL of the ingest backend, e.g. `https://pulse.example.com`.
pub const OMNIPULSE_URL_ENV: &str = "OMNIPULSE_URL";

/// Ingest key sent in the `X-Ingest-Key` header.
pub const OMNIPULSE_INGEST_KEY_ENV: &str = "OMNIPULSE_INGEST_KEY";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable, treating unset and empty the same way.
pub fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
