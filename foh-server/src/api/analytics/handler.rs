//! Analytics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::analytics::{AnalyticsSummary, DateRange, MAX_RANGE_DAYS, summarize};
use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::db::repository::order::OrderQuery;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, validate_not_future};
use crate::utils::{AppError, AppResult};

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both inclusive
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: String,
    pub to: String,
}

fn resolve_range(query: &SummaryQuery) -> AppResult<DateRange> {
    let from = parse_date(&query.from)?;
    let to = parse_date(&query.to)?;
    if from > to {
        return Err(AppError::validation(format!(
            "from ({from}) must not be after to ({to})"
        )));
    }
    validate_not_future(from)?;
    validate_not_future(to)?;

    let days = (to - from).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(AppError::validation(format!(
            "Date range is {days} days, max {MAX_RANGE_DAYS}"
        )));
    }
    Ok(DateRange { from, to })
}

/// GET /api/analytics/summary - 区间营业汇总
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<AnalyticsSummary>> {
    let range = resolve_range(&query)?;

    let repo = OrderRepository::new(state.get_db());
    let orders = repo
        .find(&OrderQuery {
            created_from: Some(day_start_millis(range.from)),
            created_to: Some(day_end_millis(range.to)),
            ..OrderQuery::default()
        })
        .await?;

    tracing::debug!(
        from = %range.from,
        to = %range.to,
        orders = orders.len(),
        "Computing analytics summary"
    );
    Ok(Json(summarize(&orders, range)))
}
