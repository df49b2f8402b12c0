//! API response envelope and error codes
//!
//! - `ApiResponse<T>`: unified wrapper for acknowledgements and errors
//! - `error_codes`: standard error code constants

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::TradeId;

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: payload on success, absent on error
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Error half of every handler's `Result`
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn bad_request(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(error_codes::INVALID_PARAMETER, msg)),
    )
}

/// Storage failures never leak their details to clients
pub fn internal_error(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(error_codes::INTERNAL_ERROR, msg)),
    )
}

/// `POST /trades` acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct EnqueueResponse {
    /// Queue position assigned to the trade
    #[schema(example = 42)]
    pub trade_id: TradeId,
}

/// Standard API error codes
pub mod error_codes {
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}
