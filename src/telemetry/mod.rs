//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use self::logging::{init_logging, LogFormat};
pub use self::metrics::{
    init_metrics, record_ingest, record_object_upload_failure, record_query, IngestStatus,
    QueryOutcome,
};

use crate::config::TelemetryConfig;

/// Initialize logging, and the metrics exporter when a port is configured
pub fn init_telemetry(config: &TelemetryConfig, with_metrics: bool) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format.into())?;

    if with_metrics {
        if let Some(port) = config.metrics_port {
            init_metrics(port)?;
        }
    }

    Ok(())
}
