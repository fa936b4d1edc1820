use std::sync::Arc;
use std::time::Instant;

use omnipulse::noop_sink::NoopSink;
use omnipulse::{Client, ClientConfig};

#[tokio::main]
async fn main() {
    let sink = Arc::new(NoopSink::default());
    let client = Client::with_sink(ClientConfig::new("http://127.0.0.1:9", "load-test"), sink)
        .expect("start client");
    let logger = client.logger();

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        logger.error(format!("default load test error {i}"));
    }

    let elapsed = start.elapsed();
    println!("default config: appended {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    client.shutdown().await.expect("final flush");
    println!("{:?}", client.stats());
}
