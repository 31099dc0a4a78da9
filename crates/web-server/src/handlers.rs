use std::sync::Arc;

use aggregation::quarter_deals;
use axum::extract::{Path, State};
use axum::Json;
use core_types::{Quarter, QuarterDeal, SalesDataBundle};
use serde_json::json;

use crate::error::AppError;
use crate::AppState;

/// # GET /api/sales-data
/// The full bundle, exactly as the active source produced it.
pub async fn get_sales_data(State(state): State<Arc<AppState>>) -> Json<SalesDataBundle> {
    Json(state.bundle.clone())
}

/// # GET /api/quarter-deals/:quarter
/// The bundle's quarter deals filtered by month-of-quarter. A malformed
/// quarter id, or one outside the modeled year, is a client error.
pub async fn get_quarter_deals(
    Path(quarter): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<QuarterDeal>>, AppError> {
    let parsed: Quarter = quarter
        .parse()
        .map_err(|_| AppError::InvalidQuarter(quarter.clone()))?;
    if parsed.year() != state.modeled_year {
        return Err(AppError::InvalidQuarter(quarter));
    }
    Ok(Json(quarter_deals(&state.bundle.quarter_deal, parsed)))
}

/// # GET /api/health
/// Liveness probe; reports which adapter fed the session.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "source": state.source_name }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use core_types::QuarterDeal;
    use rust_decimal::Decimal;

    fn deal(id: &str, close_date: &str) -> QuarterDeal {
        QuarterDeal {
            id: id.to_string(),
            client_name: "Acme Corp".to_string(),
            deal_name: "Acme Corp – Platform".to_string(),
            close_date: close_date.to_string(),
            segment: "Fintechs".to_string(),
            acv: Decimal::from(100_000),
            arr_forecast: Decimal::from(95_000),
            annualized_transaction_forecast: 40_000,
            deal_owner: "Alex Morgan".to_string(),
            target_account: false,
            latest_next_steps: "Contract sent for signature.".to_string(),
            confidence_quarter_close: 70,
        }
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            bundle: SalesDataBundle {
                quarter_deal: vec![
                    deal("q1", "2026-02-10"),
                    deal("q2", "2026-05-20"),
                    deal("q2-late", "2026-06-01"),
                ],
                ..SalesDataBundle::default()
            },
            source_name: "mock",
            modeled_year: 2026,
        })
    }

    #[tokio::test]
    async fn quarter_deals_filters_by_month_of_quarter() {
        let Json(deals) = get_quarter_deals(Path("2026Q2".to_string()), State(state()))
            .await
            .unwrap();
        let ids: Vec<&str> = deals.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["q2", "q2-late"]);
    }

    #[tokio::test]
    async fn malformed_quarter_ids_are_client_errors() {
        for bad in ["2026Q7", "garbage", "2025Q1"] {
            let err = get_quarter_deals(Path(bad.to_string()), State(state()))
                .await
                .err()
                .unwrap_or_else(|| panic!("{bad} should be rejected"));
            let response = err.into_response();
            assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn health_reports_the_active_source() {
        let Json(body) = health(State(state())).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["source"], "mock");
    }

    #[tokio::test]
    async fn sales_data_returns_the_whole_bundle() {
        let Json(bundle) = get_sales_data(State(state())).await;
        assert_eq!(bundle.quarter_deal.len(), 3);
    }
}
