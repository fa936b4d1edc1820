use crate::record::{Event, EventKind, JobRecord, LogRecord, MetricSample, SpanRecord};
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One snapshot of all four buffers, owned by exactly one flush.
#[derive(Debug, Default)]
pub struct Batch {
    pub logs: Vec<LogRecord>,
    pub spans: Vec<SpanRecord>,
    pub metrics: Vec<MetricSample>,
    pub jobs: Vec<JobRecord>,
}

impl Batch {
    fn with_capacity(capacity: usize) -> Self {
        Batch {
            logs: Vec::with_capacity(capacity),
            spans: Vec::with_capacity(capacity),
            metrics: Vec::with_capacity(capacity),
            jobs: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Log => self.logs.len(),
            EventKind::Span => self.spans.len(),
            EventKind::Metric => self.metrics.len(),
            EventKind::Job => self.jobs.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.logs.len() + self.spans.len() + self.metrics.len() + self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Result of [`Buffers::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pushed {
    Buffered,
    /// The event's buffer is at or over the flush threshold.
    ThresholdReached,
    /// The buffers were closed; the event was discarded.
    Rejected,
}

struct Live {
    batch: Batch,
    closed: bool,
}

/// The four live, append-only buffers behind one lock.
///
/// The lock guards buffer identity, membership and the closed flag. It is
/// never held while a batch is serialized or sent: [`Buffers::take`] swaps
/// the live buffers for fresh ones and the caller does I/O on the returned
/// batch.
pub struct Buffers {
    live: Mutex<Live>,
    capacity: usize,
}

impl Buffers {
    pub fn new(capacity: usize) -> Self {
        Buffers {
            live: Mutex::new(Live {
                batch: Batch::with_capacity(capacity),
                closed: false,
            }),
            capacity,
        }
    }

    // Buffers hold plain Vecs, so a panic elsewhere cannot leave them torn.
    fn lock(&self) -> MutexGuard<'_, Live> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `event` to its buffer unless the buffers are closed.
    pub fn push(&self, event: Event) -> Pushed {
        let mut live = self.lock();
        if live.closed {
            return Pushed::Rejected;
        }
        let batch = &mut live.batch;
        let len = match event {
            Event::Log(record) => {
                batch.logs.push(record);
                batch.logs.len()
            }
            Event::Span(record) => {
                batch.spans.push(record);
                batch.spans.len()
            }
            Event::Metric(sample) => {
                batch.metrics.push(sample);
                batch.metrics.len()
            }
            Event::Job(record) => {
                batch.jobs.push(record);
                batch.jobs.len()
            }
        };
        if len >= self.capacity {
            Pushed::ThresholdReached
        } else {
            Pushed::Buffered
        }
    }

    /// Move every buffered record into a new batch, leaving empty buffers.
    pub fn take(&self) -> Batch {
        let fresh = Batch::with_capacity(self.capacity);
        let mut live = self.lock();
        mem::replace(&mut live.batch, fresh)
    }

    /// Reject all further pushes and return what was buffered, in one
    /// critical section. `None` if the buffers were already closed.
    pub fn close_and_take(&self) -> Option<Batch> {
        let mut live = self.lock();
        if live.closed {
            return None;
        }
        live.closed = true;
        Some(mem::take(&mut live.batch))
    }

    pub fn len(&self, kind: EventKind) -> usize {
        self.lock().batch.len(kind)
    }
}
