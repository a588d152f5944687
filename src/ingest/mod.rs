//! Ingestion job
//!
//! Pulls tomorrow's spot prices from the upstream summary, writes them to the
//! document store and publishes a MessagePack copy to the object store. The
//! job never fails outward: every run ends in an [`IngestOutcome`].

mod schedule;
mod transform;

pub use schedule::{fiscal_year, market_now, market_offset, target_date, FISCAL_YEAR_START_MONTH};
pub use transform::{build_document, rows_for_date};

use crate::feed::{FeedError, PriceFeed};
use crate::price::{document_id, object_key, upstream_date, PriceDocument};
use crate::store::{DocumentStore, ObjectStore, StoreError, Stores};
use crate::telemetry::{self, IngestStatus};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Content type of the distribution file
pub const MSGPACK_CONTENT_TYPE: &str = "application/x-msgpack";

/// Errors that abort an ingestion run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{0}")]
    Feed(#[from] FeedError),
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Result of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Prices stored
    Success,
    /// Upstream has nothing for the target date yet
    NoData,
    /// Run aborted; carries the error text
    Failed(String),
}

impl IngestOutcome {
    /// Response body reported to the trigger
    pub fn body(&self) -> String {
        match self {
            IngestOutcome::Success => json!({ "message": "success" }).to_string(),
            IngestOutcome::NoData => json!({ "message": "no tomorrow data" }).to_string(),
            IngestOutcome::Failed(message) => format!("Error: {}", message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, IngestOutcome::Success)
    }

    fn status(&self) -> IngestStatus {
        match self {
            IngestOutcome::Success => IngestStatus::Success,
            IngestOutcome::NoData => IngestStatus::NoData,
            IngestOutcome::Failed(_) => IngestStatus::Failed,
        }
    }
}

/// Fetch → filter → reshape → store pipeline
pub struct Ingestor {
    feed: Arc<dyn PriceFeed>,
    documents: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
}

impl Ingestor {
    pub fn new(
        feed: Arc<dyn PriceFeed>,
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            feed,
            documents,
            objects,
        }
    }

    pub fn with_stores(feed: Arc<dyn PriceFeed>, stores: &Stores) -> Self {
        Self::new(feed, stores.documents.clone(), stores.objects.clone())
    }

    /// Ingest prices for `target`, reporting instead of failing
    pub async fn run(&self, target: NaiveDate) -> IngestOutcome {
        let started = Instant::now();

        let outcome = match self.ingest(target).await {
            Ok(Some(doc)) => {
                tracing::info!(date = %target, areas = doc.len(), "success");
                IngestOutcome::Success
            }
            Ok(None) => {
                tracing::info!(date = %target, "no tomorrow data");
                IngestOutcome::NoData
            }
            Err(e) => {
                tracing::error!(date = %target, error = %e, "Error: {}", e);
                IngestOutcome::Failed(e.to_string())
            }
        };

        telemetry::record_ingest(outcome.status(), started.elapsed());
        outcome
    }

    /// Returns the stored document, or `None` when there was nothing to store
    async fn ingest(&self, target: NaiveDate) -> Result<Option<PriceDocument>, IngestError> {
        let fiscal_year = fiscal_year(target);
        tracing::info!(date = %target, fiscal_year, "Fetching spot summary");

        let summary = self.feed.fetch_summary(fiscal_year).await?;
        // unreadable rows only matter on the day being ingested
        if let Some(rejected) = summary.rejected_on(&upstream_date(target)) {
            return Err(FeedError::from(rejected.clone()).into());
        }

        let day = rows_for_date(&summary.rows, target);
        tracing::debug!(
            total_rows = summary.rows.len(),
            rejected_rows = summary.rejected.len(),
            day_rows = day.len(),
            "Filtered to target date"
        );

        if day.is_empty() {
            return Ok(None);
        }

        let doc = build_document(day);
        let id = document_id(target);
        self.documents.merge(&id, &doc).await?;
        tracing::info!(document = %id, "Stored price document");

        // the document is already stored, a failed upload only gets logged
        if let Err(e) = self.publish(target, &doc).await {
            telemetry::record_object_upload_failure();
            tracing::error!(date = %target, error = %e, "Failed to publish distribution file");
        }

        Ok(Some(doc))
    }

    async fn publish(&self, target: NaiveDate, doc: &PriceDocument) -> anyhow::Result<()> {
        let body = doc.to_msgpack()?;
        let key = object_key(target);
        self.objects.put(&key, body, MSGPACK_CONTENT_TYPE).await?;
        tracing::info!(key = %key, "Published distribution file");
        Ok(())
    }
}
