use crate::client::Client;
use crate::record::{LogLevel, LogRecord, Tags};
use crate::tracer::Span;

/// Builds [`LogRecord`]s stamped with the client's service name.
#[derive(Clone)]
pub struct Logger {
    client: Client,
}

impl Logger {
    pub(crate) fn new(client: Client) -> Self {
        Logger { client }
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message, Tags::new());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, Tags::new());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message, Tags::new());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message, Tags::new());
    }

    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message, Tags::new());
    }

    /// Log with tags. An empty map is shipped without a `tags` field.
    pub fn log(&self, level: LogLevel, message: impl Into<String>, tags: Tags) {
        let record = self.record(level, message, tags);
        self.client.append_log(record);
    }

    /// Log correlated with `span`: the record carries its trace and span ids.
    pub fn log_in_span(&self, span: &Span, level: LogLevel, message: impl Into<String>, tags: Tags) {
        let record = self.span_record(span, level, message, tags);
        self.client.append_log(record);
    }

    fn span_record(&self, span: &Span, level: LogLevel, message: impl Into<String>, tags: Tags) -> LogRecord {
        let mut record = self.record(level, message, tags);
        record.trace_id = Some(span.trace_id().to_string());
        record.span_id = Some(span.span_id().to_string());
        record
    }

    fn record(&self, level: LogLevel, message: impl Into<String>, tags: Tags) -> LogRecord {
        let mut record = LogRecord::new(level, message);
        record.service_name = self.client.config().service_name.clone();
        record.tags = (!tags.is_empty()).then_some(tags);
        record
    }
}
