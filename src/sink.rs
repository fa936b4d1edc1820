use crate::error::SendError;
use crate::record::{JobRecord, LogRecord, MetricSample, SpanRecord};
use async_trait::async_trait;

/// Asynchronous destination for swapped-out batches.
///
/// The client calls these methods after releasing its buffer lock, from
/// either a spawned flush task, the background scheduler or the caller of
/// [`crate::client::Client::flush`]. Each call is exactly one delivery
/// attempt: implementations must not retry, and the client never hands
/// a failed batch back to them.
#[async_trait]
pub trait IngestSink: Send + Sync {
    /// Deliver a non-empty batch of log records.
    ///
    /// **Returns**
    /// - `Ok(())` if the backend accepted the batch.
    /// - `Err(..)` on serialization, transport or status failure. The
    ///   batch is dropped either way.
    async fn send_logs(&self, logs: &[LogRecord]) -> Result<(), SendError>;

    /// Deliver a non-empty batch of finished spans.
    async fn send_spans(&self, spans: &[SpanRecord]) -> Result<(), SendError>;

    /// Deliver a non-empty batch of metric samples.
    async fn send_metrics(&self, metrics: &[MetricSample]) -> Result<(), SendError>;

    /// Deliver a single job record. Jobs have no batch envelope.
    async fn send_job(&self, job: &JobRecord) -> Result<(), SendError>;
}
