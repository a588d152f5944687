//! JEPX spot summary client
//!
//! The exchange publishes one CSV per fiscal year. It only serves the file to
//! requests that look like they come from its own market data page, so the
//! configured referer and browser user agent are sent with every request.

use super::summary::parse_summary;
use super::{FeedError, PriceFeed, SpotSummary};
use crate::config::FeedConfig;
use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::Client;
use std::time::Duration;

/// Client for the JEPX spot summary CSV
pub struct JepxFeed {
    config: FeedConfig,
    client: Client,
}

impl JepxFeed {
    /// Create a new client from feed configuration
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    /// File name of the summary for a fiscal year
    pub fn file_name(fiscal_year: i32) -> String {
        format!("spot_summary_{}.csv", fiscal_year)
    }

    /// Download the raw CSV text for a fiscal year
    pub async fn fetch_csv(&self, fiscal_year: i32) -> Result<String, FeedError> {
        let file = Self::file_name(fiscal_year);

        tracing::debug!(url = %self.config.base_url, file = %file, "Fetching spot summary");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[("dir", "spot_summary"), ("file", file.as_str())])
            .header(REFERER, self.config.referer.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                status: response.status(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

#[async_trait]
impl PriceFeed for JepxFeed {
    async fn fetch_summary(&self, fiscal_year: i32) -> Result<SpotSummary, FeedError> {
        let text = self.fetch_csv(fiscal_year).await?;
        parse_summary(&text)
    }
}
