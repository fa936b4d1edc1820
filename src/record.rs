use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form key/value map attached to logs, spans and span events.
pub type Tags = BTreeMap<String, serde_json::Value>;

/// String-only tags used by metric samples.
pub type MetricTags = BTreeMap<String, String>;

/// Severity of a [`LogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl LogRecord {
    /// Build an uncorrelated record stamped with the current time.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        LogRecord {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            service_name: None,
            trace_id: None,
            span_id: None,
            tags: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanStatus {
    Ok,
    Error,
}

/// Named, timestamped point inside a span.
#[derive(Debug, Clone, Serialize)]
pub struct SpanEvent {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Tags::is_empty")]
    pub attributes: Tags,
}

/// A finished span as shipped to `/api/ingest/traces`.
#[derive(Debug, Clone, Serialize)]
pub struct SpanRecord {
    pub trace_id: String,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub name: String,
    pub service_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ns: i64,
    pub status: SpanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Tags::is_empty")]
    pub attributes: Tags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SpanEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricSample {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<MetricTags>,
}

/// Outcome of one background job run, shipped one request per record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobRecord {
    pub job_name: String,
    pub queue: String,
    pub duration_ms: u64,
    pub wait_time_ms: u64,
    pub status: String,
    /// Sent as `""` when `None`; the field is always present on the wire.
    #[serde(serialize_with = "empty_if_none")]
    pub error: Option<String>,
    /// RFC 3339 timestamp. Filled with the current time on append when unset.
    pub ts: Option<String>,
}

fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

impl JobRecord {
    pub(crate) fn stamp_if_missing(&mut self) {
        if self.ts.as_deref().map_or(true, str::is_empty) {
            self.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
    }
}

/// The four independently buffered event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Log,
    Span,
    Metric,
    Job,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Log,
        EventKind::Span,
        EventKind::Metric,
        EventKind::Job,
    ];

    /// Path appended to the configured base URL for this kind.
    pub fn endpoint(&self) -> &'static str {
        match self {
            EventKind::Log => "/api/ingest/logs",
            EventKind::Span => "/api/ingest/traces",
            EventKind::Metric => "/api/ingest/app-metrics",
            EventKind::Job => "/api/ingest/app-job",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Log => "logs",
            EventKind::Span => "spans",
            EventKind::Metric => "metrics",
            EventKind::Job => "jobs",
        };
        f.write_str(name)
    }
}

/// A record of any kind, as accepted by [`crate::client::Client::append`].
#[derive(Debug, Clone)]
pub enum Event {
    Log(LogRecord),
    Span(SpanRecord),
    Metric(MetricSample),
    Job(JobRecord),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Log(_) => EventKind::Log,
            Event::Span(_) => EventKind::Span,
            Event::Metric(_) => EventKind::Metric,
            Event::Job(_) => EventKind::Job,
        }
    }
}

impl From<LogRecord> for Event {
    fn from(record: LogRecord) -> Self {
        Event::Log(record)
    }
}

impl From<SpanRecord> for Event {
    fn from(record: SpanRecord) -> Self {
        Event::Span(record)
    }
}

impl From<MetricSample> for Event {
    fn from(sample: MetricSample) -> Self {
        Event::Metric(sample)
    }
}

impl From<JobRecord> for Event {
    fn from(record: JobRecord) -> Self {
        Event::Job(record)
    }
}
