//! Dashboard routes.

use axum::{Json, Router, extract::State, routing::get};

use crate::{ApiResult, AppState};
use fleetbook_core::dashboard::DashboardSummary;
use fleetbook_db::DashboardRepository;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/summary", get(get_summary))
}

/// GET /dashboard/summary - Counts, expense totals, trip and ledger totals,
/// and the latest expenses.
async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    let summary = DashboardRepository::new(state.conn()).summary().await?;
    Ok(Json(summary))
}
