use crate::client::Client;
use crate::record::{LogLevel, LogRecord, Tags};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Crates whose events are never shipped: this crate's own diagnostics and
/// the HTTP stack a flush runs on. Capturing the latter would make every
/// flush buffer the next one's payload.
const IGNORED_TARGETS: &[&str] = &[
    "omnipulse",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
    "tokio_rustls",
    "want",
    "mio",
    "tokio",
    "tokio_util",
];

/// `tracing_subscriber` layer that turns application events into
/// [`LogRecord`]s and appends them to a [`Client`].
///
/// Only events at or above `min_level` are captured, and never those of the
/// crates in [`IGNORED_TARGETS`]. Appending never does
/// I/O on the emitting thread; delivery happens in the client's flushes.
pub struct IngestLayer {
    client: Client,
    min_level: Level,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Events converted and handed to the client.
    pub captured_events: Arc<AtomicU64>,
}

impl IngestLayer {
    pub fn new(client: Client, min_level: Level) -> Self {
        Self {
            client,
            min_level,
            total_events: Arc::new(AtomicU64::new(0)),
            captured_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

fn is_ignored_target(target: &str) -> bool {
    IGNORED_TARGETS.iter().any(|krate| {
        target
            .strip_prefix(krate)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"))
    })
}

fn map_level(level: &Level) -> LogLevel {
    match *level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        _ => LogLevel::Debug,
    }
}

impl<S> Layer<S> for IngestLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        let meta = event.metadata();
        // `Level` orders more verbose levels as greater.
        if *meta.level() > self.min_level || is_ignored_target(meta.target()) {
            return;
        }

        let mut fields = Tags::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        fields.insert("target".to_string(), meta.target().into());
        if let Some(module_path) = meta.module_path() {
            fields.insert("module_path".to_string(), module_path.into());
        }

        let mut record = LogRecord::new(map_level(meta.level()), message.unwrap_or_default());
        record.service_name = self.client.config().service_name.clone();
        record.tags = Some(fields);

        self.client.append_log(record);
        self.captured_events.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Tags,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
        }
    }
}
