use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Safe to call more than once; only
/// the first call installs anything.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if METRICS_HANDLE.set(handle).is_err() {
                tracing::debug!("Metrics handle already set");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Prometheus recorder not installed"),
    }
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a write to the transactions table.
pub fn record_write(operation: &'static str, paid: bool) {
    counter!(
        "transactions_written_total",
        "operation" => operation,
        "paid" => if paid { "true" } else { "false" }
    )
    .increment(1);
}

/// Count a gateway status check by outcome (`ok` or `error`).
pub fn record_gateway_check(outcome: &'static str) {
    counter!("gateway_checks_total", "outcome" => outcome).increment(1);
}
