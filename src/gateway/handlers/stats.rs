use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, internal_error};
use crate::ledger::AccountLedger;
use crate::models::AccountStats;

/// Settlement totals for one account
///
/// An account with no settled trades reports zero trades and zero profit.
#[utoipa::path(
    get,
    path = "/stats/{account}",
    params(("account" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account totals", body = AccountStats),
        (status = 500, description = "Ledger unavailable")
    ),
    tag = "Stats"
)]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> Result<Json<AccountStats>, ApiError> {
    let stats = AccountLedger::read(state.db.pool(), &account)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read stats for {}: {}", account, e);
            internal_error("cannot read account stats")
        })?;

    Ok(Json(stats))
}
