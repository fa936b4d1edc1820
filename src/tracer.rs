use crate::client::Client;
use crate::record::{SpanEvent, SpanRecord, SpanStatus, Tags};
use chrono::{DateTime, Utc};
use rand::RngCore;

const TRACE_ID_BYTES: usize = 16;
const SPAN_ID_BYTES: usize = 8;

/// Random identifier of `bytes` bytes, hex encoded.
pub fn generate_id(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Starts [`Span`]s bound to a client.
#[derive(Clone)]
pub struct Tracer {
    client: Client,
}

impl Tracer {
    pub(crate) fn new(client: Client) -> Self {
        Tracer { client }
    }

    /// Start a root span with fresh trace and span ids.
    pub fn start_span(&self, name: impl Into<String>) -> Span {
        Span {
            client: self.client.clone(),
            trace_id: generate_id(TRACE_ID_BYTES),
            span_id: generate_id(SPAN_ID_BYTES),
            parent_span_id: None,
            name: name.into(),
            start_time: Utc::now(),
            status: SpanStatus::Ok,
            status_message: None,
            attributes: Tags::new(),
            events: Vec::new(),
        }
    }

    /// Start a span in `parent`'s trace, linked to it.
    pub fn start_child(&self, name: impl Into<String>, parent: &Span) -> Span {
        self.start_span(name).child_of(parent)
    }
}

/// An in-progress span. Nothing is buffered until [`Span::end`].
///
/// Spans are passed explicitly (for example through a per-request scope)
/// to correlate logs and child spans with them.
pub struct Span {
    client: Client,
    trace_id: String,
    span_id: String,
    parent_span_id: Option<String>,
    name: String,
    start_time: DateTime<Utc>,
    status: SpanStatus,
    status_message: Option<String>,
    attributes: Tags,
    events: Vec<SpanEvent>,
}

impl Span {
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    pub fn parent_span_id(&self) -> Option<&str> {
        self.parent_span_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Join `parent`'s trace as its child.
    pub fn child_of(mut self, parent: &Span) -> Self {
        self.trace_id = parent.trace_id.clone();
        self.parent_span_id = Some(parent.span_id.clone());
        self
    }

    /// Continue a trace propagated from elsewhere, e.g. an inbound header.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    pub fn with_parent_span_id(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = Some(parent_span_id.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Tags) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn set_status(&mut self, status: SpanStatus, message: Option<String>) {
        self.status = status;
        self.status_message = message;
    }

    pub fn add_event(&mut self, name: impl Into<String>, attributes: Tags) {
        self.events.push(SpanEvent {
            name: name.into(),
            timestamp: Utc::now(),
            attributes,
        });
    }

    /// Finish the span now and hand it to the client's span buffer.
    pub fn end(self) {
        let client = self.client.clone();
        client.append_span(self.finish(Utc::now()));
    }

    fn finish(self, end_time: DateTime<Utc>) -> SpanRecord {
        let duration_ns = (end_time - self.start_time)
            .num_nanoseconds()
            .unwrap_or(i64::MAX);
        SpanRecord {
            trace_id: self.trace_id,
            span_id: self.span_id,
            parent_span_id: self.parent_span_id,
            name: self.name,
            service_name: self.client.config().service_name.clone().unwrap_or_default(),
            start_time: self.start_time,
            end_time,
            duration_ns,
            status: self.status,
            status_message: self.status_message,
            attributes: self.attributes,
            events: self.events,
        }
    }
}
