//! Reshape spot summary rows into a price document

use crate::area::Area;
use crate::feed::SpotRow;
use crate::price::{time_label, upstream_date, PriceDocument, SLOTS_PER_DAY};
use chrono::NaiveDate;

/// Rows delivered on `date`
pub fn rows_for_date(rows: &[SpotRow], date: NaiveDate) -> Vec<&SpotRow> {
    let wanted = upstream_date(date);
    rows.iter().filter(|row| row.delivery_date == wanted).collect()
}

/// Build area → time → price from one day's rows
///
/// Duplicate slots are not expected upstream; the later row wins.
pub fn build_document<'a>(rows: impl IntoIterator<Item = &'a SpotRow>) -> PriceDocument {
    let mut doc = PriceDocument::new();
    for row in rows {
        let Some(label) = time_label(row.time_code) else {
            continue;
        };
        if row.time_code > SLOTS_PER_DAY {
            tracing::warn!(
                date = %row.delivery_date,
                time_code = row.time_code,
                label = %label,
                "Time code past the last half-hour slot"
            );
        }
        for area in Area::all() {
            doc.insert_price(area.code(), label.clone(), row.price(area));
        }
    }
    doc
}
