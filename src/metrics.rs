use crate::client::Client;
use crate::record::{MetricKind, MetricSample, MetricTags};
use chrono::Utc;
use std::time::Duration;

/// Builds [`MetricSample`]s stamped with the client's service name.
///
/// Tags are given as `(key, value)` pairs; an empty slice ships no tags.
#[derive(Clone)]
pub struct Metrics {
    client: Client,
}

impl Metrics {
    pub(crate) fn new(client: Client) -> Self {
        Metrics { client }
    }

    pub fn counter(&self, name: impl Into<String>, value: f64, tags: &[(&str, &str)]) {
        self.record(name, MetricKind::Counter, value, tags);
    }

    pub fn gauge(&self, name: impl Into<String>, value: f64, tags: &[(&str, &str)]) {
        self.record(name, MetricKind::Gauge, value, tags);
    }

    pub fn histogram(&self, name: impl Into<String>, value: f64, tags: &[(&str, &str)]) {
        self.record(name, MetricKind::Histogram, value, tags);
    }

    /// Record `duration` in whole milliseconds as a histogram sample.
    pub fn record_duration(&self, name: impl Into<String>, duration: Duration, tags: &[(&str, &str)]) {
        self.histogram(name, duration.as_millis() as f64, tags);
    }

    pub fn increment(&self, name: impl Into<String>, tags: &[(&str, &str)]) {
        self.counter(name, 1.0, tags);
    }

    pub fn decrement(&self, name: impl Into<String>, tags: &[(&str, &str)]) {
        self.counter(name, -1.0, tags);
    }

    fn record(&self, name: impl Into<String>, kind: MetricKind, value: f64, tags: &[(&str, &str)]) {
        let sample = self.sample(name, kind, value, tags);
        self.client.append_metric(sample);
    }

    fn sample(&self, name: impl Into<String>, kind: MetricKind, value: f64, tags: &[(&str, &str)]) -> MetricSample {
        let tags = (!tags.is_empty()).then(|| {
            tags.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<MetricTags>()
        });
        MetricSample {
            name: name.into(),
            kind,
            value,
            timestamp: Utc::now(),
            service_name: self.client.config().service_name.clone(),
            tags,
        }
    }
}
