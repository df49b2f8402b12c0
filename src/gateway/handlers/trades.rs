use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, EnqueueResponse, bad_request, internal_error};
use crate::queue::TradeQueue;
use crate::validation::TradeSubmission;

/// Submit a trade for settlement
///
/// Validates the submission and appends it to the settlement queue.
/// Invalid submissions are rejected without touching storage.
#[utoipa::path(
    post,
    path = "/trades",
    request_body = TradeSubmission,
    responses(
        (status = 200, description = "Trade queued", body = EnqueueResponse),
        (status = 400, description = "Malformed JSON or invalid field"),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Queue unavailable")
    ),
    tag = "Trades"
)]
pub async fn post_trade(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TradeSubmission>, JsonRejection>,
) -> Result<Json<ApiResponse<EnqueueResponse>>, ApiError> {
    let Json(submission) = payload.map_err(|e| {
        tracing::debug!("Rejected trade body: {}", e);
        bad_request("invalid trade data")
    })?;

    let trade = submission.validate_into().map_err(|e| {
        tracing::debug!("Rejected trade submission: {}", e);
        bad_request(format!("invalid fields: {}", e.fields().join(", ")))
    })?;

    let trade_id = TradeQueue::enqueue(state.db.pool(), &trade)
        .await
        .map_err(|e| {
            tracing::error!("Failed to enqueue trade for {}: {}", trade.account, e);
            internal_error("cannot queue trade")
        })?;

    tracing::info!(
        trade_id,
        account = %trade.account,
        symbol = %trade.symbol,
        side = %trade.side,
        "Trade queued"
    );
    Ok(Json(ApiResponse::success(EnqueueResponse { trade_id })))
}
