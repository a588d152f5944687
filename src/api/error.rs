use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the price query endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Date parameter is missing.")]
    MissingDate,

    #[error("Date parameter must be in the format of yyyy-mm-dd.")]
    InvalidDateFormat,

    #[error("Invalid area parameter. Allowed values are {allowed}")]
    InvalidArea { area: String, allowed: String },

    #[error("No data found for the specified date.'{date}'.")]
    NoDataOnDate { date: String },

    #[error("No data found for the specified area '{area}' on date '{date}'.")]
    NoAreaDataOnDate { area: String, date: String },

    #[error("Internal server error")]
    Internal(#[from] StoreError),
}

impl ApiError {
    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingDate => "MISSING_REQUIRED_PARAMETER_DATE",
            ApiError::InvalidDateFormat => "INVALID_DATE_FORMAT",
            ApiError::InvalidArea { .. } => "INVALID_AREA_PARAMETER",
            ApiError::NoDataOnDate { .. } => "NO_DATA_ON_DATE",
            ApiError::NoAreaDataOnDate { .. } => "NO_AREA_DATA_ON_DATE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingDate | ApiError::InvalidDateFormat | ApiError::InvalidArea { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NoDataOnDate { .. } | ApiError::NoAreaDataOnDate { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref source) = self {
            tracing::error!(error = %source, "Document store failure");
        }

        let body = Json(json!({
            "type": self.kind(),
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}
