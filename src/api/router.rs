use super::error::ApiError;
use super::query::{lookup, validate, PriceQuery};
use crate::price::PriceDocument;
use crate::store::DocumentStore;
use crate::telemetry::{self, QueryOutcome};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Path of the price endpoint
pub const PRICE_PATH: &str = "/api/electricity_market_price";

/// Shared handles for request handlers
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(PRICE_PATH, get(get_prices))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /api/electricity_market_price?date=yyyy-mm-dd&area=a,b`
///
/// Parameters are read as plain pairs; a repeated key keeps its last value.
pub async fn get_prices(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PriceDocument>, ApiError> {
    let params = PriceQuery::from_pairs(pairs);
    let result = match validate(&params) {
        Ok(query) => lookup(state.documents.as_ref(), &query).await,
        Err(e) => Err(e),
    };

    let outcome = match &result {
        Ok(_) => QueryOutcome::Ok,
        Err(e) if e.status() == StatusCode::BAD_REQUEST => QueryOutcome::BadRequest,
        Err(e) if e.status() == StatusCode::NOT_FOUND => QueryOutcome::NotFound,
        Err(_) => QueryOutcome::Error,
    };
    telemetry::record_query(outcome);

    if let Err(e) = &result {
        tracing::debug!(kind = e.kind(), date = ?params.date, area = ?params.area, "Rejected price query");
    }

    result.map(Json)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
