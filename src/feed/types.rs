//! Spot summary feed types

use crate::area::Area;
use thiserror::Error;

/// One row of the upstream spot summary: a single half-hour slot
#[derive(Debug, Clone, PartialEq)]
pub struct SpotRow {
    /// Delivery date as written upstream (`yyyy/mm/dd`)
    pub delivery_date: String,
    /// 1-based half-hour slot code
    pub time_code: u32,
    /// Prices in `AREAS` order
    pub prices: [f64; 10],
}

impl SpotRow {
    /// Price of one area in this slot
    pub fn price(&self, area: Area) -> f64 {
        self.prices[area as usize]
    }
}

/// A summary row that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line in the CSV
    pub line: usize,
    /// Delivery date column as written, empty when absent
    pub delivery_date: String,
    pub message: String,
}

impl From<RejectedRow> for FeedError {
    fn from(row: RejectedRow) -> Self {
        FeedError::MalformedRow {
            line: row.line,
            message: row.message,
        }
    }
}

/// Parsed spot summary for a whole fiscal year
///
/// Rows that fail to parse are kept aside instead of failing the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotSummary {
    pub rows: Vec<SpotRow>,
    pub rejected: Vec<RejectedRow>,
}

impl SpotSummary {
    /// First rejected row delivered on `delivery_date` (`yyyy/mm/dd`)
    pub fn rejected_on(&self, delivery_date: &str) -> Option<&RejectedRow> {
        self.rejected.iter().find(|row| row.delivery_date == delivery_date)
    }
}

impl From<Vec<SpotRow>> for SpotSummary {
    fn from(rows: Vec<SpotRow>) -> Self {
        Self {
            rows,
            rejected: Vec::new(),
        }
    }
}

/// Spot summary feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure talking to the upstream
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Upstream answered with a non-success status
    #[error("upstream returned {status}")]
    Status { status: reqwest::StatusCode },
    /// Body is not UTF-8 text
    #[error("response is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    /// CSV could not be read at all
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// A required column is absent from the header row
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
    /// A row carries a value that does not parse
    #[error("line {line}: {message}")]
    MalformedRow { line: usize, message: String },
}
