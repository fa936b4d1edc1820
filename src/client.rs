use crate::buffer::{Batch, Buffers, Pushed};
use crate::config::{ClientConfig, ResolvedConfig};
use crate::error::{ConfigError, FlushError, SendError};
use crate::logger::Logger;
use crate::metrics::Metrics;
use crate::record::{Event, EventKind, JobRecord, LogLevel, LogRecord, MetricSample, SpanRecord, Tags};
use crate::scheduler;
use crate::sink::IngestSink;
use crate::tracer::Tracer;
use crate::VERSION;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// Point-in-time copy of the client's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    /// Records accepted into a buffer.
    pub appended: u64,
    /// Records discarded, either by a failed delivery or because they were
    /// appended after shutdown began.
    pub dropped: u64,
    /// Flushes that found at least one buffered record.
    pub flushes: u64,
    /// Individual delivery attempts that failed.
    pub failed_deliveries: u64,
}

#[derive(Default)]
struct Counters {
    appended: AtomicU64,
    dropped: AtomicU64,
    flushes: AtomicU64,
    failed_deliveries: AtomicU64,
}

/// Shared state behind every [`Client`] handle and the flush scheduler.
pub(crate) struct Core {
    buffers: Buffers,
    sink: Arc<dyn IngestSink>,
    settings: ClientConfig,
    runtime: Handle,
    in_flight: TaskTracker,
    cancel: CancellationToken,
    scheduler: Mutex<Option<JoinHandle<()>>>,
    counters: Counters,
}

impl Core {
    pub(crate) fn settings(&self) -> &ClientConfig {
        &self.settings
    }

    fn append(self: &Arc<Self>, mut event: Event) {
        if let Event::Job(job) = &mut event {
            job.stamp_if_missing();
        }

        let kind = event.kind();
        match self.buffers.push(event) {
            Pushed::Buffered => {
                self.counters.appended.fetch_add(1, Ordering::Relaxed);
            }
            Pushed::ThresholdReached => {
                self.counters.appended.fetch_add(1, Ordering::Relaxed);
                self.spawn_flush();
            }
            Pushed::Rejected => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(%kind, "client is shut down, dropping event");
            }
        }
    }

    /// Run a flush on the runtime without waiting for it. Shutdown waits
    /// for every flush spawned here before its own final flush.
    fn spawn_flush(self: &Arc<Self>) {
        // Once shutdown has closed the buffers there is nothing left to take.
        if self.in_flight.is_closed() {
            return;
        }
        let core = Arc::clone(self);
        self.in_flight.spawn_on(
            async move {
                if let Err(err) = core.flush().await {
                    core.report(&err, "size-triggered flush failed");
                }
            },
            &self.runtime,
        );
    }

    /// Swap out all four buffers, then deliver each non-empty batch.
    ///
    /// Every kind is attempted even if an earlier one failed; the last
    /// failure is returned. Failed batches are dropped.
    pub(crate) async fn flush(&self) -> Result<(), FlushError> {
        self.deliver(self.buffers.take()).await
    }

    async fn deliver(&self, batch: Batch) -> Result<(), FlushError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.counters.flushes.fetch_add(1, Ordering::Relaxed);
        debug!(
            logs = batch.logs.len(),
            spans = batch.spans.len(),
            metrics = batch.metrics.len(),
            jobs = batch.jobs.len(),
            "flushing buffers"
        );

        let mut last_err = None;

        if !batch.logs.is_empty() {
            if let Err(source) = self.sink.send_logs(&batch.logs).await {
                last_err = Some(self.failed(EventKind::Log, batch.logs.len(), source));
            }
        }
        if !batch.spans.is_empty() {
            if let Err(source) = self.sink.send_spans(&batch.spans).await {
                last_err = Some(self.failed(EventKind::Span, batch.spans.len(), source));
            }
        }
        if !batch.metrics.is_empty() {
            if let Err(source) = self.sink.send_metrics(&batch.metrics).await {
                last_err = Some(self.failed(EventKind::Metric, batch.metrics.len(), source));
            }
        }
        for job in &batch.jobs {
            if let Err(source) = self.sink.send_job(job).await {
                last_err = Some(self.failed(EventKind::Job, 1, source));
            }
        }

        match last_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn failed(&self, kind: EventKind, records: usize, source: SendError) -> FlushError {
        self.counters.failed_deliveries.fetch_add(1, Ordering::Relaxed);
        self.counters.dropped.fetch_add(records as u64, Ordering::Relaxed);
        let err = FlushError { kind, records, source };
        if self.settings.debug {
            warn!(error = %err, "delivery failed, batch dropped");
        } else {
            debug!(error = %err, "delivery failed, batch dropped");
        }
        err
    }

    /// Background flushes have no caller to return to; each failed kind was
    /// already logged by `failed`.
    pub(crate) fn report(&self, err: &FlushError, context: &'static str) {
        debug!(kind = %err.kind, "{context}");
    }
}

/// Handle to the telemetry pipeline.
///
/// Cloning is cheap; all clones share the same buffers, scheduler and
/// transport. The pipeline lives until [`Client::shutdown`] is awaited.
#[derive(Clone)]
pub struct Client {
    core: Arc<Core>,
}

impl Client {
    /// Build a client that ships to the configured OmniPulse endpoint over
    /// HTTP, and start its background flush loop.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// **Errors**
    /// - [`ConfigError::MissingApiUrl`] / [`ConfigError::MissingIngestKey`]
    ///   when neither the config nor the environment provide them.
    /// - [`ConfigError::NoRuntime`] outside a tokio runtime.
    #[cfg(feature = "http")]
    pub fn start(config: ClientConfig) -> Result<Self, ConfigError> {
        let resolved = config.resolve()?;
        let sink = crate::http::HttpSink::new(&resolved)?;
        Self::from_parts(resolved, Arc::new(sink))
    }

    /// Build a client that delivers batches to `sink` instead of the HTTP
    /// transport, and start its background flush loop.
    pub fn with_sink(config: ClientConfig, sink: Arc<dyn IngestSink>) -> Result<Self, ConfigError> {
        Self::from_parts(config.resolve()?, sink)
    }

    fn from_parts(resolved: ResolvedConfig, sink: Arc<dyn IngestSink>) -> Result<Self, ConfigError> {
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
        let cancel = CancellationToken::new();
        let settings = resolved.settings;

        let core = Arc::new(Core {
            buffers: Buffers::new(settings.batch_size),
            sink,
            settings,
            runtime: runtime.clone(),
            in_flight: TaskTracker::new(),
            cancel: cancel.clone(),
            scheduler: Mutex::new(None),
            counters: Counters::default(),
        });

        let handle = scheduler::spawn(&core, &runtime, cancel);
        *core.scheduler.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        debug!(
            batch_size = core.settings.batch_size,
            flush_interval = ?core.settings.flush_interval,
            environment = %core.settings.environment,
            "omnipulse client started"
        );
        Ok(Client { core })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.core.settings
    }

    pub fn logger(&self) -> Logger {
        Logger::new(self.clone())
    }

    pub fn tracer(&self) -> Tracer {
        Tracer::new(self.clone())
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::new(self.clone())
    }

    /// Buffer `event`. Never blocks on I/O: when the event's buffer reaches
    /// the batch size a flush is spawned and not awaited.
    pub fn append(&self, event: impl Into<Event>) {
        self.core.append(event.into());
    }

    pub fn append_log(&self, record: LogRecord) {
        self.append(record);
    }

    pub fn append_span(&self, record: SpanRecord) {
        self.append(record);
    }

    pub fn append_metric(&self, sample: MetricSample) {
        self.append(sample);
    }

    /// Buffer a job record, stamping `ts` with the current time if unset.
    pub fn append_job(&self, job: JobRecord) {
        self.append(job);
    }

    /// Immediately deliver everything buffered so far.
    ///
    /// Returns the last delivery failure, if any. Records of a failed kind
    /// are not re-queued.
    pub async fn flush(&self) -> Result<(), FlushError> {
        self.core.flush().await
    }

    /// Close the buffers, stop the scheduler, wait for in-flight flushes,
    /// then deliver what was buffered at close and return that result.
    ///
    /// Events appended after shutdown begins are dropped. Calling this a
    /// second time is a no-op returning `Ok(())`.
    pub async fn shutdown(&self) -> Result<(), FlushError> {
        let core = &self.core;
        // Closing and taking under one lock: nothing can land in a buffer
        // after this point.
        let Some(remaining) = core.buffers.close_and_take() else {
            return Ok(());
        };

        core.cancel.cancel();
        let scheduler = core
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = scheduler {
            if let Err(err) = handle.await {
                warn!(error = %err, "flush scheduler did not stop cleanly");
            }
        }

        core.in_flight.close();
        core.in_flight.wait().await;

        let result = core.deliver(remaining).await;
        debug!(ok = result.is_ok(), "omnipulse client shut down");
        result
    }

    /// Number of records currently waiting in the buffer for `kind`.
    pub fn buffered(&self, kind: EventKind) -> usize {
        self.core.buffers.len(kind)
    }

    pub fn stats(&self) -> ClientStats {
        let counters = &self.core.counters;
        ClientStats {
            appended: counters.appended.load(Ordering::Relaxed),
            dropped: counters.dropped.load(Ordering::Relaxed),
            flushes: counters.flushes.load(Ordering::Relaxed),
            failed_deliveries: counters.failed_deliveries.load(Ordering::Relaxed),
        }
    }

    /// Log a diagnostic message and flush at once, to verify connectivity.
    pub async fn send_test_event(&self) -> Result<(), FlushError> {
        let settings = &self.core.settings;
        let mut tags = Tags::new();
        tags.insert("sdk_version".into(), VERSION.into());
        tags.insert("environment".into(), settings.environment.clone().into());
        tags.insert("os".into(), std::env::consts::OS.into());
        tags.insert("arch".into(), std::env::consts::ARCH.into());
        if let Some(version) = &settings.version {
            tags.insert("app_version".into(), version.clone().into());
        }

        self.logger().log(LogLevel::Info, "OmniPulse SDK test message", tags);
        self.flush().await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    /// Sink that remembers what it was asked to deliver.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub deliveries: Mutex<Vec<(EventKind, Vec<String>)>>,
        pub logs: Mutex<Vec<LogRecord>>,
        pub jobs: Mutex<Vec<JobRecord>>,
        pub fail: Option<EventKind>,
        pub delay: Duration,
    }

    impl RecordingSink {
        pub fn failing(kind: EventKind) -> Self {
            Self { fail: Some(kind), ..Default::default() }
        }

        async fn record(&self, kind: EventKind, items: Vec<String>) -> Result<(), SendError> {
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            self.deliveries.lock().unwrap().push((kind, items));
            if self.fail == Some(kind) {
                return Err(SendError::Other("backend unavailable".into()));
            }
            Ok(())
        }

        pub fn calls(&self, kind: EventKind) -> usize {
            self.deliveries.lock().unwrap().iter().filter(|(k, _)| *k == kind).count()
        }

        pub fn items(&self, kind: EventKind) -> Vec<String> {
            self.deliveries
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| *k == kind)
                .flat_map(|(_, items)| items.clone())
                .collect()
        }
    }

    #[async_trait]
    impl IngestSink for RecordingSink {
        async fn send_logs(&self, logs: &[LogRecord]) -> Result<(), SendError> {
            self.logs.lock().unwrap().extend_from_slice(logs);
            self.record(EventKind::Log, logs.iter().map(|r| r.message.clone()).collect()).await
        }

        async fn send_spans(&self, spans: &[SpanRecord]) -> Result<(), SendError> {
            self.record(EventKind::Span, spans.iter().map(|s| s.name.clone()).collect()).await
        }

        async fn send_metrics(&self, metrics: &[MetricSample]) -> Result<(), SendError> {
            self.record(EventKind::Metric, metrics.iter().map(|m| m.name.clone()).collect()).await
        }

        async fn send_job(&self, job: &JobRecord) -> Result<(), SendError> {
            self.jobs.lock().unwrap().push(job.clone());
            self.record(EventKind::Job, vec![job.job_name.clone()]).await
        }
    }

    pub(crate) fn test_config(batch_size: usize) -> ClientConfig {
        ClientConfig {
            batch_size,
            flush_interval: Duration::from_secs(3600),
            ..ClientConfig::new("http://localhost", "test-key")
        }
    }

    pub(crate) fn client_with(config: ClientConfig, sink: &Arc<RecordingSink>) -> Client {
        Client::with_sink(config, Arc::clone(sink) as Arc<dyn IngestSink>).unwrap()
    }

    async fn wait_until(mut cond: impl FnMut() -> bool) {
        timeout(Duration::from_secs(2), async {
            while !cond() {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not met in time");
    }

    fn log(message: impl Into<String>) -> LogRecord {
        LogRecord::new(LogLevel::Info, message)
    }

    fn sample(name: &str) -> MetricSample {
        MetricSample {
            name: name.into(),
            kind: crate::record::MetricKind::Counter,
            value: 1.0,
            timestamp: chrono::Utc::now(),
            service_name: None,
            tags: None,
        }
    }

    fn job(name: &str) -> JobRecord {
        JobRecord {
            job_name: name.into(),
            queue: "default".into(),
            status: "completed".into(),
            ..Default::default()
        }
    }

    #[test]
    fn start_outside_runtime_fails() {
        let sink = Arc::new(RecordingSink::default());
        let result = Client::with_sink(test_config(10), sink);
        assert!(matches!(result, Err(ConfigError::NoRuntime)));
    }

    #[tokio::test]
    async fn below_threshold_nothing_is_sent() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(5), &sink);

        for n in 0..4 {
            client.append_log(log(n.to_string()));
        }
        sleep(Duration::from_millis(50)).await;

        assert_eq!(client.buffered(EventKind::Log), 4);
        assert!(sink.deliveries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reaching_batch_size_triggers_one_flush() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(3), &sink);

        for n in 0..3 {
            client.append_log(log(n.to_string()));
        }
        wait_until(|| sink.calls(EventKind::Log) == 1).await;

        assert_eq!(client.buffered(EventKind::Log), 0);
        assert_eq!(sink.items(EventKind::Log), ["0", "1", "2"]);
        assert_eq!(sink.calls(EventKind::Log), 1);
    }

    #[tokio::test]
    async fn threshold_is_tracked_per_kind() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(2), &sink);

        client.append_log(log("a"));
        client.append_metric(sample("m"));
        sleep(Duration::from_millis(50)).await;

        assert_eq!(client.buffered(EventKind::Log), 1);
        assert_eq!(client.buffered(EventKind::Metric), 1);
        assert!(sink.deliveries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_flush_makes_no_calls() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(10), &sink);

        assert!(client.flush().await.is_ok());
        assert!(sink.deliveries.lock().unwrap().is_empty());
        assert_eq!(client.stats().flushes, 0);
    }

    #[tokio::test]
    async fn failed_delivery_drops_the_batch() {
        let sink = Arc::new(RecordingSink::failing(EventKind::Log));
        let client = client_with(test_config(10), &sink);

        client.append_log(log("lost"));
        let err = client.flush().await.unwrap_err();

        assert_eq!(err.kind, EventKind::Log);
        assert_eq!(err.records, 1);
        assert_eq!(client.buffered(EventKind::Log), 0);
        assert_eq!(client.stats().dropped, 1);

        // Nothing is re-queued for the next flush.
        assert!(client.flush().await.is_ok());
        assert_eq!(sink.calls(EventKind::Log), 1);
    }

    #[tokio::test]
    async fn failure_in_one_kind_does_not_stop_the_others() {
        let sink = Arc::new(RecordingSink::failing(EventKind::Log));
        let client = client_with(test_config(10), &sink);

        client.append_log(log("a"));
        client.append_metric(sample("requests"));
        client.append_job(job("cleanup"));

        let err = client.flush().await.unwrap_err();
        assert_eq!(err.kind, EventKind::Log);
        assert_eq!(sink.items(EventKind::Metric), ["requests"]);
        assert_eq!(sink.items(EventKind::Job), ["cleanup"]);
        assert_eq!(client.stats().failed_deliveries, 1);
    }

    #[tokio::test]
    async fn jobs_are_sent_one_per_call_with_timestamp() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(10), &sink);

        client.append_job(job("a"));
        client.append_job(job("b"));
        client.flush().await.unwrap();

        assert_eq!(sink.calls(EventKind::Job), 2);
        let jobs = sink.jobs.lock().unwrap();
        assert!(jobs.iter().all(|j| j.ts.is_some()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_flushes_neither_lose_nor_duplicate() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(10_000), &sink);

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let client = client.clone();
                tokio::spawn(async move {
                    for n in 0..250 {
                        client.append_log(log(format!("{p}-{n}")));
                        if n % 25 == 0 {
                            tokio::task::yield_now().await;
                        }
                    }
                })
            })
            .collect();
        let flushers: Vec<_> = (0..3)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move {
                    for _ in 0..20 {
                        client.flush().await.unwrap();
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for handle in producers.into_iter().chain(flushers) {
            handle.await.unwrap();
        }
        client.shutdown().await.unwrap();

        let items = sink.items(EventKind::Log);
        let unique: HashSet<_> = items.iter().collect();
        assert_eq!(items.len(), 1000);
        assert_eq!(unique.len(), 1000);
    }

    #[tokio::test]
    async fn shutdown_drains_every_buffer() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(10), &sink);

        client.append_log(log("bye"));
        client.append_metric(sample("m"));
        client.append_job(job("j"));
        client.tracer().start_span("op").end();

        client.shutdown().await.unwrap();

        for kind in EventKind::ALL {
            assert_eq!(client.buffered(kind), 0, "{kind}");
            assert_eq!(sink.calls(kind), 1, "{kind}");
        }
    }

    #[tokio::test]
    async fn shutdown_drains_even_when_delivery_fails() {
        let sink = Arc::new(RecordingSink::failing(EventKind::Span));
        let client = client_with(test_config(10), &sink);

        client.append_log(log("a"));
        client.tracer().start_span("op").end();

        assert!(client.shutdown().await.is_err());
        for kind in EventKind::ALL {
            assert_eq!(client.buffered(kind), 0, "{kind}");
        }
    }

    #[tokio::test]
    async fn shutdown_waits_for_size_triggered_flushes() {
        let sink = Arc::new(RecordingSink {
            delay: Duration::from_millis(100),
            ..Default::default()
        });
        let client = client_with(test_config(1), &sink);

        client.append_log(log("in-flight"));
        // Let the spawned flush take the record and enter the slow sink.
        sleep(Duration::from_millis(10)).await;
        assert_eq!(client.buffered(EventKind::Log), 0);
        client.shutdown().await.unwrap();

        assert_eq!(sink.items(EventKind::Log), ["in-flight"]);
        assert_eq!(sink.calls(EventKind::Log), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shutdown_leaves_nothing_behind_while_producers_run() {
        for _ in 0..20 {
            let sink = Arc::new(RecordingSink::default());
            let client = client_with(test_config(1_000_000), &sink);
            let stop = Arc::new(AtomicBool::new(false));

            let producers: Vec<_> = (0..6)
                .map(|p| {
                    let client = client.clone();
                    let stop = Arc::clone(&stop);
                    std::thread::spawn(move || {
                        let mut attempts = 0u64;
                        while !stop.load(Ordering::Relaxed) {
                            client.append_log(log(format!("{p}-{attempts}")));
                            attempts += 1;
                        }
                        attempts
                    })
                })
                .collect();

            sleep(Duration::from_millis(5)).await;
            client.shutdown().await.unwrap();
            assert_eq!(client.buffered(EventKind::Log), 0);

            stop.store(true, Ordering::Relaxed);
            let attempts: u64 = producers.into_iter().map(|p| p.join().unwrap()).sum();

            let stats = client.stats();
            assert_eq!(client.buffered(EventKind::Log), 0);
            assert_eq!(sink.items(EventKind::Log).len() as u64, stats.appended);
            assert_eq!(stats.appended + stats.dropped, attempts);
        }
    }

    #[tokio::test]
    async fn append_proceeds_while_a_delivery_is_in_flight() {
        let sink = Arc::new(RecordingSink {
            delay: Duration::from_millis(200),
            ..Default::default()
        });
        let client = client_with(test_config(10), &sink);

        client.append_log(log("first"));
        let in_flight = tokio::spawn({
            let client = client.clone();
            async move { client.flush().await }
        });
        sleep(Duration::from_millis(50)).await;

        let started = std::time::Instant::now();
        client.append_log(log("second"));
        assert!(started.elapsed() < Duration::from_millis(50));
        assert_eq!(client.buffered(EventKind::Log), 1);

        in_flight.await.unwrap().unwrap();
        assert_eq!(sink.items(EventKind::Log), ["first"]);

        client.flush().await.unwrap();
        assert_eq!(sink.calls(EventKind::Log), 2);
        assert_eq!(sink.items(EventKind::Log), ["first", "second"]);
    }

    #[tokio::test]
    async fn shutdown_is_idempotent_and_rejects_late_events() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(10), &sink);

        client.shutdown().await.unwrap();
        client.append_log(log("late"));
        client.shutdown().await.unwrap();

        assert_eq!(client.buffered(EventKind::Log), 0);
        assert_eq!(client.stats().dropped, 1);
        assert!(sink.deliveries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn scheduler_flushes_on_interval() {
        let sink = Arc::new(RecordingSink::default());
        let config = ClientConfig {
            flush_interval: Duration::from_millis(20),
            ..test_config(100)
        };
        let client = client_with(config, &sink);

        client.append_log(log("tick"));
        wait_until(|| sink.calls(EventKind::Log) == 1).await;

        assert_eq!(client.buffered(EventKind::Log), 0);
        client.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn scheduler_survives_failed_flushes() {
        let sink = Arc::new(RecordingSink::failing(EventKind::Log));
        let config = ClientConfig {
            flush_interval: Duration::from_millis(20),
            ..test_config(100)
        };
        let client = client_with(config, &sink);

        client.append_log(log("first"));
        wait_until(|| sink.calls(EventKind::Log) == 1).await;
        client.append_log(log("second"));
        wait_until(|| sink.calls(EventKind::Log) == 2).await;

        client.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_event_carries_sdk_tags() {
        let sink = Arc::new(RecordingSink::default());
        let client = client_with(test_config(10), &sink);

        client.send_test_event().await.unwrap();

        assert_eq!(sink.items(EventKind::Log), ["OmniPulse SDK test message"]);
        assert_eq!(client.stats().appended, 1);
    }
}
