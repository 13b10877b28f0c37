use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::SaleDate;
use crate::engine::DailySummary;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub date: String,
    pub total_price: String,
    pub total_gas: String,
    pub count: u64,
}

fn summary_dto(date: SaleDate, summary: &DailySummary) -> SummaryDto {
    SummaryDto {
        date: date.to_string(),
        total_price: summary.total_price.to_canonical_string(),
        total_gas: summary.total_gas.to_canonical_string(),
        count: summary.count,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummariesResponse {
    pub days: Vec<SummaryDto>,
}

/// GET /v1/summary?date=YYYY-MM-DD: one date's totals (default today),
/// covering the active store and the day archive.
pub async fn get_summary(
    Query(params): Query<SummaryQuery>,
    State(state): State<AppState>,
) -> Result<Json<SummaryDto>, AppError> {
    let date = super::parse_date_or_today(params.date.as_deref(), state.clock.as_ref())?;
    let summary = state.ledger.summary_on(date).await?;
    Ok(Json(summary_dto(date, &summary)))
}

/// GET /v1/summary/daily: totals for every date present anywhere,
/// ascending by date.
pub async fn get_daily_summaries(
    State(state): State<AppState>,
) -> Result<Json<DailySummariesResponse>, AppError> {
    let days = state.ledger.summary_by_date().await?;
    Ok(Json(DailySummariesResponse {
        days: days
            .iter()
            .map(|(date, summary)| summary_dto(*date, summary))
            .collect(),
    }))
}
