//! Financial report route.

use std::collections::{HashMap, HashSet};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use coffeetech_core::report::{CashFlowKind, PlotRef, ReportLine, ReportService};
use coffeetech_db::{CatalogRepository, TransactionRepository};

use crate::AppState;
use crate::auth::{READ_FINANCIAL_REPORT, SessionTokenQuery, authenticate, authorize_farm_action};
use crate::response::{error_response, success_response};
use crate::routes::{client_failure, db_failure, transactions::transaction_failure};

/// Request body for generating a financial report.
#[derive(Debug, Deserialize)]
pub struct FinancialReportRequest {
    /// Plots to include (at least one).
    pub plot_ids: Vec<i32>,
    /// Start of the reporting period (inclusive).
    pub start_date: NaiveDate,
    /// End of the reporting period (inclusive).
    pub end_date: NaiveDate,
    /// Whether to attach the per-transaction history.
    #[serde(default)]
    pub include_transaction_history: bool,
}

/// POST /reports/financial-report
async fn financial_report(
    State(state): State<AppState>,
    Query(query): Query<SessionTokenQuery>,
    Json(payload): Json<FinancialReportRequest>,
) -> Result<Response, Response> {
    let user = authenticate(&state.users, query.session_token.as_deref()).await?;

    if payload.plot_ids.is_empty() {
        return Err(error_response(
            "At least one plot must be requested",
            StatusCode::BAD_REQUEST,
        ));
    }

    if payload.start_date > payload.end_date {
        return Err(error_response(
            "The start date must not be after the end date",
            StatusCode::BAD_REQUEST,
        ));
    }

    // Unknown or inactive plots are dropped rather than failing the whole
    // report.
    let mut plots: Vec<PlotRef> = Vec::with_capacity(payload.plot_ids.len());
    let mut farm_ids: HashSet<i32> = HashSet::new();
    for plot_id in &payload.plot_ids {
        match state
            .farms
            .verify_plot(*plot_id)
            .await
            .map_err(|e| client_failure(&e))?
        {
            Some(plot) => {
                farm_ids.insert(plot.farm_id);
                plots.push(PlotRef {
                    plot_id: plot.plot_id,
                    name: plot.name,
                });
            }
            None => warn!(plot_id, "Skipping unknown or inactive plot"),
        }
    }

    if plots.is_empty() {
        return Err(error_response(
            "None of the requested plots exist",
            StatusCode::NOT_FOUND,
        ));
    }

    if farm_ids.len() > 1 {
        return Err(error_response(
            "All requested plots must belong to the same farm",
            StatusCode::BAD_REQUEST,
        ));
    }

    // Exactly one farm ID remains at this point.
    let farm_id = farm_ids
        .into_iter()
        .next()
        .ok_or_else(|| error_response("Internal error", StatusCode::INTERNAL_SERVER_ERROR))?;

    let farm = state
        .farms
        .get_farm_by_id(farm_id)
        .await
        .map_err(|e| client_failure(&e))?
        .ok_or_else(|| {
            error_response("The specified farm does not exist", StatusCode::NOT_FOUND)
        })?;

    authorize_farm_action(
        &state.farms,
        &state.users,
        user.user_id,
        farm_id,
        READ_FINANCIAL_REPORT,
        "view financial reports",
    )
    .await?;

    let plot_ids: Vec<i32> = plots.iter().map(|p| p.plot_id).collect();
    let repo = TransactionRepository::new(state.db.clone());
    let rows = repo
        .list_for_report(&plot_ids, payload.start_date, payload.end_date)
        .await
        .map_err(|e| transaction_failure(&e))?;

    let category_ids: Vec<i32> = rows.iter().map(|t| t.transaction_category_id).collect();
    let catalog = CatalogRepository::new(state.db.clone());
    let index = catalog
        .category_index(&category_ids)
        .await
        .map_err(|e| db_failure(&e))?;

    let lines: Vec<ReportLine> = rows
        .iter()
        .map(|row| {
            let (category_name, type_name) = index.get(&row.transaction_category_id).map_or_else(
                || ("Unknown".to_string(), "Unknown".to_string()),
                |(category, kind)| {
                    (
                        category.name.clone(),
                        kind.as_ref()
                            .map_or_else(|| "Unknown".to_string(), |t| t.name.clone()),
                    )
                },
            );

            if CashFlowKind::from_type_name(&type_name).is_none() {
                warn!(
                    transaction_id = row.transaction_id,
                    transaction_type = %type_name,
                    "Skipping transaction with unclassifiable type"
                );
            }

            ReportLine {
                transaction_id: row.transaction_id,
                plot_id: row.plot_id,
                date: row.transaction_date,
                transaction_type: type_name,
                category: category_name,
                value: row.value,
                creator_id: row.creator_id,
            }
        })
        .collect();

    let creator_names = if payload.include_transaction_history {
        Some(resolve_creator_names(&state, &lines).await)
    } else {
        None
    };

    let report = ReportService::generate(
        &farm.name,
        &plots,
        (payload.start_date, payload.end_date),
        &lines,
        creator_names.as_ref(),
    );

    Ok(success_response(
        "Financial report generated successfully",
        &report,
    ))
}

/// Resolves creator display names with a per-request cache.
///
/// Lookup failures leave the creator out of the map; the report falls back
/// to `User #{id}` for those.
async fn resolve_creator_names(state: &AppState, lines: &[ReportLine]) -> HashMap<i32, String> {
    let creator_ids: HashSet<i32> = lines.iter().map(|l| l.creator_id).collect();

    let mut names = HashMap::with_capacity(creator_ids.len());
    for creator_id in creator_ids {
        match state.users.get_user_by_id(creator_id).await {
            Ok(Some(user)) => {
                names.insert(creator_id, user.name);
            }
            Ok(None) => warn!(creator_id, "Creator not found in users service"),
            Err(e) => warn!(creator_id, error = %e, "Creator lookup failed"),
        }
    }

    names
}

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/financial-report", post(financial_report))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::FinancialReportRequest;

    #[test]
    fn test_request_parses_with_history_flag() {
        let body = json!({
            "plot_ids": [1, 2, 3],
            "start_date": "2025-01-01",
            "end_date": "2025-03-31",
            "include_transaction_history": true
        });

        let parsed: FinancialReportRequest = serde_json::from_value(body).expect("should parse");
        assert_eq!(parsed.plot_ids, vec![1, 2, 3]);
        assert!(parsed.include_transaction_history);
    }

    #[test]
    fn test_history_flag_defaults_to_false() {
        let body = json!({
            "plot_ids": [1],
            "start_date": "2025-01-01",
            "end_date": "2025-01-31"
        });

        let parsed: FinancialReportRequest = serde_json::from_value(body).expect("should parse");
        assert!(!parsed.include_transaction_history);
    }
}
