use crate::config::ResolvedConfig;
use crate::error::{ConfigError, SendError};
use crate::record::{EventKind, JobRecord, LogRecord, MetricSample, SpanRecord};
use crate::sink::IngestSink;
use crate::VERSION;
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

pub const INGEST_KEY_HEADER: &str = "X-Ingest-Key";

/// Value of the `User-Agent` header sent with every request.
pub fn user_agent() -> String {
    format!("omnipulse-rust-sdk/{VERSION}")
}

/// [`IngestSink`] that POSTs gzip-compressed JSON to the OmniPulse ingest API.
///
/// One `reqwest::Client` (and its connection pool) is shared by every flush
/// and every kind; each request is bounded by the configured timeout.
#[derive(Clone)]
pub struct HttpSink {
    client: Client,
    base_url: String,
    ingest_key: String,
}

#[derive(Serialize)]
struct LogsEnvelope<'a> {
    logs: &'a [LogRecord],
}

#[derive(Serialize)]
struct SpansEnvelope<'a> {
    spans: &'a [SpanRecord],
}

#[derive(Serialize)]
struct MetricsEnvelope<'a> {
    metrics: &'a [MetricSample],
}

impl HttpSink {
    pub fn new(config: &ResolvedConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.settings.timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            ingest_key: config.ingest_key.clone(),
        })
    }

    fn endpoint(&self, kind: EventKind) -> String {
        format!("{}{}", self.base_url, kind.endpoint())
    }

    async fn post<T: Serialize + ?Sized>(&self, kind: EventKind, payload: &T) -> Result<(), SendError> {
        let body = encode(payload)?;
        debug!(%kind, bytes = body.len(), "posting batch");

        let resp = self
            .client
            .post(self.endpoint(kind))
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_ENCODING, "gzip")
            .header(INGEST_KEY_HEADER, &self.ingest_key)
            .header(USER_AGENT, user_agent())
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() < 400 {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(SendError::Status {
                endpoint: kind.endpoint(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Serialize `payload` to JSON and gzip it.
pub(crate) fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>, SendError> {
    let json = serde_json::to_vec(payload)?;
    let mut encoder = GzEncoder::new(Vec::with_capacity(json.len() / 4), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

#[async_trait]
impl IngestSink for HttpSink {
    async fn send_logs(&self, logs: &[LogRecord]) -> Result<(), SendError> {
        self.post(EventKind::Log, &LogsEnvelope { logs }).await
    }

    async fn send_spans(&self, spans: &[SpanRecord]) -> Result<(), SendError> {
        self.post(EventKind::Span, &SpansEnvelope { spans }).await
    }

    async fn send_metrics(&self, metrics: &[MetricSample]) -> Result<(), SendError> {
        self.post(EventKind::Metric, &MetricsEnvelope { metrics }).await
    }

    async fn send_job(&self, job: &JobRecord) -> Result<(), SendError> {
        self.post(EventKind::Job, job).await
    }
}
