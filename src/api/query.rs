//! Parameter validation and document lookup for the price endpoint

use super::error::ApiError;
use crate::area::Area;
use crate::price::{document_id, PriceDocument};
use crate::store::DocumentStore;
use chrono::NaiveDate;

/// Raw query string parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceQuery {
    pub date: Option<String>,
    pub area: Option<String>,
}

impl PriceQuery {
    /// Collect from decoded `key=value` pairs; a repeated key keeps its last value
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "date" => query.date = Some(value),
                "area" => query.area = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// Parameters that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub date: NaiveDate,
    /// Requested areas in request order, `None` for all
    pub areas: Option<Vec<Area>>,
}

/// Validate parameters; the first failing rule wins
pub fn validate(params: &PriceQuery) -> Result<ValidatedQuery, ApiError> {
    let raw_date = params.date.as_deref().ok_or(ApiError::MissingDate)?;
    let date = parse_date(raw_date).ok_or(ApiError::InvalidDateFormat)?;

    let areas = match params.area.as_deref() {
        None | Some("") => None,
        Some(list) => Some(parse_areas(list)?),
    };

    Ok(ValidatedQuery { date, areas })
}

/// Strict `yyyy-mm-dd` with a real calendar date
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    // reject forms chrono tolerates, such as unpadded fields
    (document_id(date) == raw).then_some(date)
}

fn parse_areas(list: &str) -> Result<Vec<Area>, ApiError> {
    list.split(',')
        .map(|token| {
            token.parse::<Area>().map_err(|e| ApiError::InvalidArea {
                area: e.0,
                allowed: Area::allowed_codes(),
            })
        })
        .collect()
}

/// Fetch the document for a validated query and narrow it to the requested areas
pub async fn lookup(
    store: &dyn DocumentStore,
    query: &ValidatedQuery,
) -> Result<PriceDocument, ApiError> {
    let id = document_id(query.date);
    let doc = store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NoDataOnDate { date: id.clone() })?;

    let Some(areas) = &query.areas else {
        return Ok(doc);
    };

    let mut selected = PriceDocument::new();
    for area in areas {
        let prices = doc.get(area.code()).ok_or_else(|| ApiError::NoAreaDataOnDate {
            area: area.code().to_string(),
            date: id.clone(),
        })?;
        selected.insert_area(area.code(), prices.clone());
    }
    Ok(selected)
}
