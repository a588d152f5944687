//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Outcome label for query API requests
#[derive(Debug, Clone, Copy)]
pub enum QueryOutcome {
    Ok,
    BadRequest,
    NotFound,
    Error,
}

/// Status label for ingestion runs
#[derive(Debug, Clone, Copy)]
pub enum IngestStatus {
    Success,
    NoData,
    Failed,
}

/// Start the Prometheus scrape endpoint
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

/// Count one query API request
pub fn record_query(outcome: QueryOutcome) {
    let label = match outcome {
        QueryOutcome::Ok => "ok",
        QueryOutcome::BadRequest => "bad_request",
        QueryOutcome::NotFound => "not_found",
        QueryOutcome::Error => "error",
    };
    metrics::counter!("jepx_query_requests_total", "outcome" => label).increment(1);
}

/// Count one ingestion run and record its duration
pub fn record_ingest(status: IngestStatus, duration: Duration) {
    let label = match status {
        IngestStatus::Success => "success",
        IngestStatus::NoData => "no_data",
        IngestStatus::Failed => "failed",
    };
    metrics::counter!("jepx_ingest_runs_total", "status" => label).increment(1);
    metrics::histogram!("jepx_ingest_duration_ms").record(duration.as_secs_f64() * 1000.0);
}

/// Count a failed distribution file upload
pub fn record_object_upload_failure() {
    metrics::counter!("jepx_object_upload_failures_total").increment(1);
}
