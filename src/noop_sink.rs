use crate::error::SendError;
use crate::record::{JobRecord, LogRecord, MetricSample, SpanRecord};
use crate::sink::IngestSink;
use async_trait::async_trait;

/// A sink that simply drops all batches.
///
/// Useful for measuring the overhead of buffering and flushing without any
/// network I/O.
#[derive(Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl IngestSink for NoopSink {
    async fn send_logs(&self, _logs: &[LogRecord]) -> Result<(), SendError> {
        Ok(())
    }

    async fn send_spans(&self, _spans: &[SpanRecord]) -> Result<(), SendError> {
        Ok(())
    }

    async fn send_metrics(&self, _metrics: &[MetricSample]) -> Result<(), SendError> {
        Ok(())
    }

    async fn send_job(&self, _job: &JobRecord) -> Result<(), SendError> {
        Ok(())
    }
}
