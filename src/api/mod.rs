//! Query API
//!
//! Serves stored price documents over HTTP with parameter validation and
//! typed `{type, message}` errors.

mod error;
mod query;
mod router;

pub use error::ApiError;
pub use query::{lookup, validate, PriceQuery, ValidatedQuery};
pub use router::{create_router, get_prices, AppState, PRICE_PATH};
