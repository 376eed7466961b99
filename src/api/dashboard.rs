//! Dashboard endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::chart::{generate_interpolated_array, ChartTick},
    models::unique_visitors::{DateRange, UniqueVisitorsParams, UniqueVisitorsRow},
};

/// Number of ticks precomputed for the chart's value axis
const VALUE_AXIS_TICK_COUNT: usize = 5;

/// Query parameters for the unique-visitors dashboard
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DashboardQuery {
    /// Date range selector (last_day, last_week, last_month, last_year)
    pub date_range: Option<String>,
    /// Maximum number of countries on the heatmap
    pub country_limit: Option<String>,
}

/// Data bag for rendering the unique-visitors heatmap
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Aggregated cells, descending by value
    pub unique_visitors: Vec<UniqueVisitorsRow>,
    /// Date range the window was derived from
    pub date_range: DateRange,
    /// Country cap actually applied
    pub country_limit: i64,
    /// Value-axis ticks from 0 to the maximum cell value; empty when there
    /// is no data
    pub value_axis: Vec<ChartTick>,
}

/// Get unique visitors per country and hour of day
#[utoipa::path(
    get,
    path = "/dashboard/unique-visitors",
    tag = "dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Unique visitors heatmap data", body = DashboardResponse),
        (status = 502, description = "Analytics engine failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_unique_visitors(
    State(state): State<crate::AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let date_range = query
        .date_range
        .as_deref()
        .and_then(DateRange::from_param)
        .unwrap_or_default();
    let country_limit = resolve_country_limit(
        query.country_limit.as_deref(),
        state.config.dashboard.default_country_limit,
    );

    let until = Utc::now();
    let from = date_range.window_start(until);

    let unique_visitors = state
        .services
        .unique_visitors
        .get_unique_visitors(&UniqueVisitorsParams {
            limit: country_limit,
            from,
            until,
        })
        .await?;

    let value_axis = value_axis_ticks(&unique_visitors)?;

    Ok(Json(DashboardResponse {
        unique_visitors,
        date_range,
        country_limit,
        value_axis,
    }))
}

/// Absent or non-numeric values fall back to the configured default.
fn resolve_country_limit(param: Option<&str>, default: i64) -> i64 {
    param
        .and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Value-axis ticks interpolated from 0 to the maximum cell value.
fn value_axis_ticks(rows: &[UniqueVisitorsRow]) -> AppResult<Vec<ChartTick>> {
    let max = rows.iter().map(|row| row.value).max().unwrap_or(0);
    if max == 0 {
        return Ok(Vec::new());
    }
    let values = generate_interpolated_array(VALUE_AXIS_TICK_COUNT, max as f64)?;
    Ok(values.into_iter().map(ChartTick::from_value).collect())
}
