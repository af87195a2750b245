use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber. Intended for binaries and tests;
/// the library itself only emits events.
///
/// Without `RUST_LOG`, the named service crate and `shared` log at debug
/// and dependencies stay at info.
pub fn init_tracing(service_name: &'static str) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(service_name)))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_level(true)
            .compact())
        .try_init()?;

    tracing::info!(service = service_name, "✅ Logging initialized");

    Ok(())
}

fn default_directives(service_name: &str) -> String {
    let crate_target = service_name.replace('-', "_");
    if crate_target == "shared" {
        "info,shared=debug".to_string()
    } else {
        format!("info,shared=debug,{}=debug", crate_target)
    }
}

pub fn record_timing(metric_name: &'static str, duration_secs: f64) {
    metrics::histogram!(metric_name).record(duration_secs);
}

pub fn record_counter(metric_name: &'static str, value: u64) {
    metrics::counter!(metric_name).increment(value);
}
