use std::sync::Arc;
use std::time::Instant;
use tokio::time::Duration;

use omnipulse::env::env_or;
use omnipulse::noop_sink::NoopSink;
use omnipulse::{Client, ClientConfig};

#[tokio::main]
async fn main() {
    let sink = Arc::new(NoopSink::default());

    let config = ClientConfig {
        batch_size: 1_000,
        flush_interval: Duration::from_millis(200),
        ..ClientConfig::new("http://127.0.0.1:9", "load-test")
    };
    let client = Client::with_sink(config, sink).expect("start client");

    let n: u64 = env_or("LOAD_EVENTS", "100000").parse().unwrap_or(100_000);
    let producers = 4;
    let start = Instant::now();

    let handles: Vec<_> = (0..producers)
        .map(|p| {
            let metrics = client.metrics();
            let producer = p.to_string();
            tokio::spawn(async move {
                for i in 0..n / producers {
                    metrics.increment("load.events", &[("producer", producer.as_str())]);
                    if i % 1_000 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.expect("producer task");
    }

    let elapsed = start.elapsed();
    println!("custom config: appended {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    client.shutdown().await.expect("final flush");
    println!("{:?}", client.stats());
}
