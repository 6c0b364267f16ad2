use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Until this runs, the `record_*` helpers
/// are no-ops.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Metrics recorder already initialized"))
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a remote query by name and outcome (`success` / `error`).
pub fn record_query(query: &'static str, outcome: &'static str) {
    ::metrics::counter!("console_query_total", "query" => query, "outcome" => outcome)
        .increment(1);
}

/// Count a message submission by outcome (`sent` / `failed` / `interrupted`).
pub fn record_submission(outcome: &'static str) {
    ::metrics::counter!("console_message_submissions_total", "outcome" => outcome).increment(1);
}
