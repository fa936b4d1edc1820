use crate::client::Client;
use crate::layer::IngestLayer;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the `tracing` bridge.
///
/// **Fields**
/// - `min_level`: least severe level forwarded to the client as a log
///   record. More verbose events are ignored by the bridge.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   stacked on top of [`IngestLayer`] so events are also printed locally.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub min_level: Level,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_level: Level::INFO,
            enable_stdout: true,
        }
    }
}

/// Install a global `tracing` subscriber that forwards events to `client`.
///
/// **Parameters**
/// - `client`: started [`Client`] that will buffer the resulting
///   [`crate::record::LogRecord`]s.
/// - `config`: [`LayerConfig`] controlling level filtering and local output.
///
/// **Errors**
///
/// Fails if a global default subscriber was already installed.
pub fn init_tracing_with_config(client: &Client, config: LayerConfig) -> Result<(), SetGlobalDefaultError> {
    let layer = IngestLayer::new(client.clone(), config.min_level);

    // The two branches build different subscriber types.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Initialize the bridge with [`LayerConfig::default`]: `INFO` and above,
/// echoed to stdout.
pub fn init_tracing(client: &Client) -> Result<(), SetGlobalDefaultError> {
    init_tracing_with_config(client, LayerConfig::default())
}
