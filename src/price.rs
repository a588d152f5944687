//! Price document model shared by ingestion and the query API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Collection holding one document per delivery date
pub const COLLECTION: &str = "electricity_market_price";

/// Number of half-hour slots in a delivery day
pub const SLOTS_PER_DAY: u32 = 48;

/// Clock-time label (`HH:MM`) → price in JPY/kWh
pub type AreaPrices = BTreeMap<String, f64>;

/// Area code → time label → price for one delivery date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceDocument(BTreeMap<String, AreaPrices>);

impl PriceDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, area: &str) -> Option<&AreaPrices> {
        self.0.get(area)
    }

    pub fn contains_area(&self, area: &str) -> bool {
        self.0.contains_key(area)
    }

    /// Record one price; an existing entry for the same slot is replaced
    pub fn insert_price(&mut self, area: &str, time: String, price: f64) {
        self.0.entry(area.to_string()).or_default().insert(time, price);
    }

    /// Replace the whole time series of an area
    pub fn insert_area(&mut self, area: impl Into<String>, prices: AreaPrices) {
        self.0.insert(area.into(), prices);
    }

    /// Merge-write: slots in `other` overwrite, every other slot is kept
    pub fn merge(&mut self, other: PriceDocument) {
        for (area, prices) in other.0 {
            self.0.entry(area).or_default().extend(prices);
        }
    }

    pub fn areas(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AreaPrices)> {
        self.0.iter()
    }

    /// Encode as a MessagePack map for distribution
    pub fn to_msgpack(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(self)
    }
}

impl FromIterator<(String, AreaPrices)> for PriceDocument {
    fn from_iter<I: IntoIterator<Item = (String, AreaPrices)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Convert a 1-based upstream time-slot code to its `HH:MM` start time
///
/// Returns `None` for code 0. Codes past 48 are not rejected here: 49 maps
/// to `24:00`.
pub fn time_label(code: u32) -> Option<String> {
    let index = code.checked_sub(1)?;
    let hour = index / 2;
    let minute = if index % 2 == 0 { "00" } else { "30" };
    Some(format!("{:02}:{}", hour, minute))
}

/// Document id form of a date (`yyyy-mm-dd`)
pub fn document_id(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Upstream CSV form of a date (`yyyy/mm/dd`)
pub fn upstream_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Object store key of the MessagePack blob for a date
pub fn object_key(date: NaiveDate) -> String {
    format!("{}/price.msgpack", upstream_date(date))
}
