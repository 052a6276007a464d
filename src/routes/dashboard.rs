use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::stats::{DashboardStats, RecentApplication},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Aggregate counts", body = DashboardStats)
    )
)]
#[axum::debug_handler]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.dashboard_service.stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/recent",
    params(
        ("limit" = Option<u32>, Query, description = "Number of rows, 1 to 50 (default 10)")
    ),
    responses(
        (status = 200, description = "Most recent applications", body = [RecentApplication])
    )
)]
#[axum::debug_handler]
pub async fn get_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse> {
    let recent = state.dashboard_service.recent(query.limit).await?;
    Ok(Json(recent))
}
