use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::firm::billing::BillingSummary;
use crate::firm::reports::{
    self, CaseTypeRevenue, CasesOverview, ClientProfitability, DashboardOverview, UserTaskStats,
};
use crate::web::server::AppState;
use crate::web::types::{ApiError, internal_error};

use super::{field_datetime, finish_validation};

#[derive(Debug, Deserialize)]
pub struct FinancialOverviewQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn cases_overview_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CasesOverview>, ApiError> {
    reports::get_cases_overview(state.db.as_ref())
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn financial_overview_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FinancialOverviewQuery>,
) -> Result<Json<BillingSummary>, ApiError> {
    let mut errors = Vec::new();
    let from = match query.from.as_deref() {
        Some(raw) => field_datetime(raw, "from", &mut errors),
        None => None,
    };
    let to = match query.to.as_deref() {
        Some(raw) => field_datetime(raw, "to", &mut errors),
        None => None,
    };
    finish_validation(errors)?;

    reports::get_financial_overview(state.db.as_ref(), from, to)
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn team_performance_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserTaskStats>>, ApiError> {
    reports::get_team_performance(state.db.as_ref())
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn client_profitability_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ClientProfitability>>, ApiError> {
    reports::get_client_profitability(state.db.as_ref())
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn top_case_types_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CaseTypeRevenue>>, ApiError> {
    reports::get_top_case_types(state.db.as_ref())
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardOverview>, ApiError> {
    reports::get_dashboard_overview(state.db.as_ref())
        .await
        .map(Json)
        .map_err(internal_error)
}
