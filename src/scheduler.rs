use crate::client::Core;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Spawn the periodic flush loop for `core`.
///
/// The loop holds only a weak reference, so it also ends once every
/// client handle is gone. Flush errors are reported through `tracing` and
/// never stop the loop.
pub(crate) fn spawn(core: &Arc<Core>, runtime: &Handle, cancel: CancellationToken) -> JoinHandle<()> {
    let period = core.settings().flush_interval;
    runtime.spawn(run(Arc::downgrade(core), period, cancel))
}

async fn run(core: Weak<Core>, period: Duration, cancel: CancellationToken) {
    // `interval` fires immediately; the first flush is due one period in.
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let Some(core) = core.upgrade() else { break };
                trace!("scheduled flush");
                if let Err(err) = core.flush().await {
                    core.report(&err, "scheduled flush failed");
                }
            }
        }
    }

    debug!("flush scheduler stopped");
}
