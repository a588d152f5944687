//! Ingest command implementation

use crate::config::Config;
use crate::feed::JepxFeed;
use crate::ingest::{market_now, market_offset, target_date, IngestOutcome, Ingestor};
use crate::store::Stores;
use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Delivery date to ingest instead of tomorrow (yyyy-mm-dd)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl IngestArgs {
    /// Run one ingestion and print the status body
    ///
    /// Setup failures are reported the same way as pipeline failures, so the
    /// scheduler only ever sees a body, never a crash.
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let outcome = match self.build(config) {
            Ok((ingestor, target)) => ingestor.run(target).await,
            Err(e) => {
                tracing::error!(error = %e, "Error: {}", e);
                IngestOutcome::Failed(e.to_string())
            }
        };

        println!("{}", outcome.body());
        Ok(())
    }

    fn build(&self, config: &Config) -> anyhow::Result<(Ingestor, NaiveDate)> {
        let offset = market_offset(config.schedule.utc_offset_hours).ok_or_else(|| {
            anyhow::anyhow!(
                "schedule.utc_offset_hours out of range: {}",
                config.schedule.utc_offset_hours
            )
        })?;
        let target = self
            .date
            .unwrap_or_else(|| target_date(&market_now(offset)));

        let feed = Arc::new(JepxFeed::new(config.feed.clone())?);
        let stores = Stores::from_config(&config.store)?;
        Ok((Ingestor::with_stores(feed, &stores), target))
    }
}
