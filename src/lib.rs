//! Telemetry client for the OmniPulse ingest API.
//!
//! Logs, spans, metric samples and job records are appended to per-kind
//! buffers and delivered in batches when a buffer fills up, on a fixed
//! interval, on demand, and once more on shutdown. Delivery is
//! at-most-once: a batch that fails to send is dropped.

pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod record;
pub mod sink;

#[cfg(feature = "http")]
pub mod http;

pub mod init;
pub mod layer;
pub mod logger;
pub mod metrics;
pub mod noop_sink;
pub mod tracer;

mod buffer;
mod scheduler;

pub use client::{Client, ClientStats};
pub use config::ClientConfig;
pub use error::{ConfigError, FlushError, SendError};
pub use record::{
    Event, EventKind, JobRecord, LogLevel, LogRecord, MetricKind, MetricSample, SpanEvent, SpanRecord,
    SpanStatus, Tags,
};

/// Client version reported in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
