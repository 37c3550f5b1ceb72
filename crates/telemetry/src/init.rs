// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// The default filter directive when `RUST_LOG` is unset: every crate at
/// `info`, with `agentgov_crypto` quieted to `warn` since it is on the hot
/// path of every signed ledger append and action validation and would
/// otherwise log once per signature operation.
const DEFAULT_FILTER_DIRECTIVE: &str = "info,agentgov_crypto=warn";

/// Initializes the global `tracing` subscriber for structured JSON logging
/// to stderr, bridging any `log`-crate callers through `tracing-log` so
/// both facades end up on the same subscriber.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER_DIRECTIVE));
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
