//! Spot price feed module
//!
//! Fetches and parses the JEPX spot summary. The upstream CSV layout and the
//! request headers it expects live entirely behind [`PriceFeed`].

mod jepx;
mod summary;
mod types;

pub use jepx::JepxFeed;
pub use summary::{parse_summary, DATE_COLUMN, TIME_CODE_COLUMN};
pub use types::{FeedError, RejectedRow, SpotRow, SpotSummary};

use async_trait::async_trait;

/// Trait for spot summary sources
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch the summary published for a fiscal year
    async fn fetch_summary(&self, fiscal_year: i32) -> Result<SpotSummary, FeedError>;
}
