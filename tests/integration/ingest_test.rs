//! Integration tests for the ingestion pipeline

use async_trait::async_trait;
use chrono::NaiveDate;
use jepx_spot::area::Area;
use jepx_spot::feed::{FeedError, PriceFeed, RejectedRow, SpotRow, SpotSummary};
use jepx_spot::ingest::{IngestOutcome, Ingestor, MSGPACK_CONTENT_TYPE};
use jepx_spot::price::PriceDocument;
use jepx_spot::store::{
    DocumentStore, MemoryDocumentStore, MemoryObjectStore, ObjectStore, StoreError,
};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Feed returning a canned summary and remembering the fiscal year asked for
struct StaticFeed {
    summary: SpotSummary,
    requested_year: AtomicI32,
}

impl StaticFeed {
    fn new(rows: Vec<SpotRow>) -> Arc<Self> {
        Self::with_summary(rows.into())
    }

    fn with_summary(summary: SpotSummary) -> Arc<Self> {
        Arc::new(Self {
            summary,
            requested_year: AtomicI32::new(0),
        })
    }
}

#[async_trait]
impl PriceFeed for StaticFeed {
    async fn fetch_summary(&self, fiscal_year: i32) -> Result<SpotSummary, FeedError> {
        self.requested_year.store(fiscal_year, Ordering::SeqCst);
        Ok(self.summary.clone())
    }
}

struct FailingFeed;

#[async_trait]
impl PriceFeed for FailingFeed {
    async fn fetch_summary(&self, _fiscal_year: i32) -> Result<SpotSummary, FeedError> {
        Err(FeedError::MissingColumn("受渡日"))
    }
}

struct FailingObjects;

#[async_trait]
impl ObjectStore for FailingObjects {
    async fn put(&self, _key: &str, _body: Vec<u8>, _content_type: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("bucket not found".into()))
    }
}

struct FailingDocuments;

#[async_trait]
impl DocumentStore for FailingDocuments {
    async fn get(&self, _id: &str) -> Result<Option<PriceDocument>, StoreError> {
        Ok(None)
    }

    async fn merge(&self, _id: &str, _doc: &PriceDocument) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("permission denied".into()))
    }
}

fn day_rows(date: &str, base: f64) -> Vec<SpotRow> {
    (1..=48)
        .map(|code| {
            let mut prices = [0.0; 10];
            for (i, p) in prices.iter_mut().enumerate() {
                *p = base + code as f64 + i as f64 * 0.25;
            }
            SpotRow {
                delivery_date: date.to_string(),
                time_code: code,
                prices,
            }
        })
        .collect()
}

fn june_2() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
}

#[tokio::test]
async fn test_successful_run() {
    let mut rows = day_rows("2024/06/01", 100.0);
    rows.extend(day_rows("2024/06/02", 0.0));
    let feed = StaticFeed::new(rows);
    let documents = Arc::new(MemoryDocumentStore::new());
    let objects = Arc::new(MemoryObjectStore::new());
    let ingestor = Ingestor::new(feed.clone(), documents.clone(), objects.clone());

    let outcome = ingestor.run(june_2()).await;
    assert_eq!(outcome, IngestOutcome::Success);
    assert_eq!(outcome.body(), r#"{"message":"success"}"#);
    assert_eq!(feed.requested_year.load(Ordering::SeqCst), 2024);

    let doc = documents.get("2024-06-02").await.unwrap().unwrap();
    assert_eq!(doc.len(), 10);
    for area in Area::all() {
        assert_eq!(doc.get(area.code()).unwrap().len(), 48);
    }
    assert_eq!(doc.get("system").unwrap()["00:00"], 1.0);
    assert_eq!(doc.get("tokyo").unwrap()["23:30"], 48.75);
    assert!(documents.get("2024-06-01").await.unwrap().is_none());

    let object = objects.object("2024/06/02/price.msgpack").await.unwrap();
    assert_eq!(object.content_type, MSGPACK_CONTENT_TYPE);
    let published: PriceDocument = rmp_serde::from_slice(&object.body).unwrap();
    assert_eq!(published, doc);
}

#[tokio::test]
async fn test_no_rows_for_target_date() {
    let documents = Arc::new(MemoryDocumentStore::new());
    let objects = Arc::new(MemoryObjectStore::new());
    let ingestor = Ingestor::new(
        StaticFeed::new(day_rows("2024/06/01", 0.0)),
        documents.clone(),
        objects.clone(),
    );

    let outcome = ingestor.run(june_2()).await;
    assert_eq!(outcome, IngestOutcome::NoData);
    assert_eq!(outcome.body(), r#"{"message":"no tomorrow data"}"#);
    assert_eq!(documents.writes(), 0);
    assert!(objects.is_empty().await);
}

#[tokio::test]
async fn test_fiscal_year_before_april() {
    let feed = StaticFeed::new(Vec::new());
    let ingestor = Ingestor::new(
        feed.clone(),
        Arc::new(MemoryDocumentStore::new()),
        Arc::new(MemoryObjectStore::new()),
    );

    ingestor.run(NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()).await;
    assert_eq!(feed.requested_year.load(Ordering::SeqCst), 2023);
}

#[tokio::test]
async fn test_feed_failure_is_reported() {
    let documents = Arc::new(MemoryDocumentStore::new());
    let ingestor = Ingestor::new(
        Arc::new(FailingFeed),
        documents.clone(),
        Arc::new(MemoryObjectStore::new()),
    );

    let outcome = ingestor.run(june_2()).await;
    assert_eq!(outcome, IngestOutcome::Failed("missing column: 受渡日".into()));
    assert_eq!(outcome.body(), "Error: missing column: 受渡日");
    assert_eq!(documents.writes(), 0);
}

#[tokio::test]
async fn test_object_store_failure_does_not_fail_run() {
    let documents = Arc::new(MemoryDocumentStore::new());
    let ingestor = Ingestor::new(
        StaticFeed::new(day_rows("2024/06/02", 0.0)),
        documents.clone(),
        Arc::new(FailingObjects),
    );

    let outcome = ingestor.run(june_2()).await;
    assert!(outcome.is_success());
    assert!(documents.get("2024-06-02").await.unwrap().is_some());
}

#[tokio::test]
async fn test_document_store_failure_skips_upload() {
    let objects = Arc::new(MemoryObjectStore::new());
    let ingestor = Ingestor::new(
        StaticFeed::new(day_rows("2024/06/02", 0.0)),
        Arc::new(FailingDocuments),
        objects.clone(),
    );

    let outcome = ingestor.run(june_2()).await;
    assert!(matches!(outcome, IngestOutcome::Failed(ref msg) if msg.contains("permission denied")));
    assert!(objects.is_empty().await);
}

#[tokio::test]
async fn test_rerun_merges_into_existing_document() {
    let mut existing = PriceDocument::new();
    existing.insert_price("note", "00:00".into(), 0.0);
    existing.insert_price("tokyo", "00:00".into(), 999.0);
    let documents = Arc::new(MemoryDocumentStore::with_documents([(
        "2024-06-02".to_string(),
        existing,
    )]));
    let ingestor = Ingestor::new(
        StaticFeed::new(day_rows("2024/06/02", 0.0)),
        documents.clone(),
        Arc::new(MemoryObjectStore::new()),
    );

    assert!(ingestor.run(june_2()).await.is_success());

    let doc = documents.get("2024-06-02").await.unwrap().unwrap();
    assert!(doc.contains_area("note"));
    assert_eq!(doc.get("tokyo").unwrap()["00:00"], 1.75);
    assert_eq!(doc.len(), 11);
}

fn rejected(line: usize, date: &str) -> RejectedRow {
    RejectedRow {
        line,
        delivery_date: date.to_string(),
        message: "invalid tokyo price 'n/a'".to_string(),
    }
}

#[tokio::test]
async fn test_malformed_row_on_other_day_is_ignored() {
    let feed = StaticFeed::with_summary(SpotSummary {
        rows: day_rows("2024/06/02", 0.0),
        rejected: vec![rejected(10, "2024/05/01")],
    });
    let documents = Arc::new(MemoryDocumentStore::new());
    let ingestor = Ingestor::new(feed, documents.clone(), Arc::new(MemoryObjectStore::new()));

    assert_eq!(ingestor.run(june_2()).await, IngestOutcome::Success);
    let stored = documents.get("2024-06-02").await.unwrap().unwrap();
    assert_eq!(stored.get("tokyo").unwrap().len(), 48);
}

#[tokio::test]
async fn test_malformed_row_on_target_day_fails_run() {
    let mut rows = day_rows("2024/06/02", 0.0);
    rows.pop();
    let feed = StaticFeed::with_summary(SpotSummary {
        rows,
        rejected: vec![rejected(2000, "2024/06/02")],
    });
    let documents = Arc::new(MemoryDocumentStore::new());
    let ingestor = Ingestor::new(feed, documents.clone(), Arc::new(MemoryObjectStore::new()));

    let outcome = ingestor.run(june_2()).await;
    assert_eq!(
        outcome,
        IngestOutcome::Failed("line 2000: invalid tokyo price 'n/a'".to_string())
    );
    assert_eq!(documents.writes(), 0);
}
