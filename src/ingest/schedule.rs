//! Delivery date and fiscal year resolution

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

/// First month of the Japanese fiscal year
pub const FISCAL_YEAR_START_MONTH: u32 = 4;

/// Market time zone for an offset in hours from UTC
pub fn market_offset(utc_offset_hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(utc_offset_hours.checked_mul(3600)?)
}

/// Current time in the market time zone
pub fn market_now(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

/// Delivery date targeted by a run at `now`: the next calendar day
pub fn target_date<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    (now.clone() + Duration::days(1)).date_naive()
}

/// Fiscal year a delivery date is published under (April to March)
pub fn fiscal_year(date: NaiveDate) -> i32 {
    if date.month() < FISCAL_YEAR_START_MONTH {
        date.year() - 1
    } else {
        date.year()
    }
}
