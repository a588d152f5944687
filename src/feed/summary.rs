//! Spot summary CSV parsing
//!
//! The upstream file carries many more columns (volumes, block prices, ...).
//! Only the delivery date, the slot code and the ten area prices are read;
//! every other column is ignored so that unrelated schema changes upstream do
//! not break ingestion.

use super::types::{FeedError, RejectedRow, SpotRow, SpotSummary};
use crate::area::{Area, AREAS};
use csv::StringRecord;
use std::collections::HashMap;

/// Delivery date column (`yyyy/mm/dd`)
pub const DATE_COLUMN: &str = "受渡日";
/// Half-hour slot code column
pub const TIME_CODE_COLUMN: &str = "時刻コード";

/// Column positions resolved from the header row
struct ColumnIndex {
    date: usize,
    time_code: usize,
    prices: [usize; 10],
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, FeedError> {
        let by_name: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_header(name), idx))
            .collect();

        let find = |name: &'static str| {
            by_name
                .get(name)
                .copied()
                .ok_or(FeedError::MissingColumn(name))
        };

        let mut prices = [0usize; 10];
        for info in AREAS.iter() {
            prices[info.area as usize] = find(info.column)?;
        }

        Ok(Self {
            date: find(DATE_COLUMN)?,
            time_code: find(TIME_CODE_COLUMN)?,
            prices,
        })
    }
}

fn normalize_header(name: &str) -> &str {
    // UTF-8 exports may start with a BOM
    name.trim().trim_start_matches('\u{feff}')
}

/// Parse the full spot summary CSV
///
/// A missing column fails the whole file. A row with an unreadable value is
/// logged and set aside in [`SpotSummary::rejected`].
pub fn parse_summary(text: &str) -> Result<SpotSummary, FeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = ColumnIndex::resolve(reader.headers()?)?;

    let mut summary = SpotSummary::default();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, lines are 1-based
        let line = idx + 2;
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        match parse_row(&record, &columns, line) {
            Ok(row) => summary.rows.push(row),
            Err(rejected) => {
                tracing::warn!(
                    line,
                    date = %rejected.delivery_date,
                    error = %rejected.message,
                    "Skipping malformed summary row"
                );
                summary.rejected.push(rejected);
            }
        }
    }

    tracing::debug!(
        rows = summary.rows.len(),
        rejected = summary.rejected.len(),
        "Parsed spot summary"
    );
    Ok(summary)
}

fn parse_row(record: &StringRecord, columns: &ColumnIndex, line: usize) -> Result<SpotRow, RejectedRow> {
    let delivery_date = record.get(columns.date).unwrap_or_default().to_string();

    let values = if delivery_date.is_empty() {
        Err(format!("missing value for {}", DATE_COLUMN))
    } else {
        parse_values(record, columns)
    };

    match values {
        Ok((time_code, prices)) => Ok(SpotRow {
            delivery_date,
            time_code,
            prices,
        }),
        Err(message) => Err(RejectedRow {
            line,
            delivery_date,
            message,
        }),
    }
}

/// Slot code and area prices of one record
fn parse_values(record: &StringRecord, columns: &ColumnIndex) -> Result<(u32, [f64; 10]), String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| format!("missing value for {}", name))
    };

    let raw_code = field(columns.time_code, TIME_CODE_COLUMN)?;
    let time_code: u32 = raw_code
        .parse()
        .map_err(|_| format!("invalid time code '{}'", raw_code))?;
    if time_code == 0 {
        return Err("time code must be 1-based".to_string());
    }

    let mut prices = [0f64; 10];
    for area in Area::all() {
        let raw = field(columns.prices[area as usize], area.column())?;
        prices[area as usize] = raw
            .parse()
            .map_err(|_| format!("invalid {} price '{}'", area, raw))?;
    }

    Ok((time_code, prices))
}
