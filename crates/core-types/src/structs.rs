use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time KPI snapshot shown on the overview cards. Single row; the
/// optional deltas are percentage movement against the previous period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesKpis {
    #[serde(rename = "forecastARR")]
    pub forecast_arr: Decimal,
    pub pipeline_value: Decimal,
    pub closed_won: u32,
    pub win_rate: Decimal,
    #[serde(
        rename = "forecastARRDelta",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub forecast_arr_delta: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_value_delta: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_won_delta: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate_delta: Option<Decimal>,
}

/// Aggregated forecast-vs-target for one month of the forecast window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: String,
    pub forecast: Decimal,
    pub target: Decimal,
}

/// Forecast-vs-target carrying the segment dimension, so callers can filter
/// before aggregating into [`ForecastPoint`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPointBySegment {
    pub month: String,
    pub segment: String,
    pub forecast: Decimal,
    pub target: Decimal,
}

/// One pipeline stage: total open value and deal count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStage {
    pub name: String,
    pub value: Decimal,
    pub count: u32,
}

/// One category's share of the whole, as displayed in the distribution donut.
/// `value` is an integer percentage; across a non-empty distribution the
/// values sum to exactly 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSegment {
    pub name: String,
    pub value: Decimal,
    pub fill: String,
}

/// Estimated ARR per month split by revenue kind. The per-month detail rows
/// in [`ArrMonthDetail`] sum to these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrByMonthPoint {
    pub month: String,
    pub license: Decimal,
    pub minimum: Decimal,
    pub volume_driven: Decimal,
}

/// Client-level detail for license revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrLicenseItem {
    pub client_name: String,
    pub amount: Decimal,
    pub segment: String,
}

/// Client-level detail for contractual-minimum revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrMinimumItem {
    pub client_name: String,
    pub amount: Decimal,
    pub segment: String,
}

/// Client-level detail for volume-driven revenue; `amount` is
/// `transactions * price_point`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrVolumeItem {
    pub client_name: String,
    pub transactions: i64,
    pub price_point: Decimal,
    pub amount: Decimal,
    pub segment: String,
}

/// All client-level ARR detail for one month.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrMonthDetail {
    pub license: Vec<ArrLicenseItem>,
    pub minimum: Vec<ArrMinimumItem>,
    pub volume_driven: Vec<ArrVolumeItem>,
}

/// A single open deal; `close_date` is a `YYYY-MM` key and is the grouping
/// key for the monthly ACV rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDeal {
    pub id: String,
    pub name: String,
    pub acv: Decimal,
    pub close_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    pub segment: String,
}

/// Derived monthly ACV rollup point. `month` is the display label for
/// `month_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcvByMonth {
    pub month: String,
    pub month_key: String,
    #[serde(rename = "totalACV")]
    pub total_acv: Decimal,
}

/// Closed-won client count per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientWinsPoint {
    pub period: String,
    pub wins: u32,
}

/// A client deal row for the accounts table; `close_date` is a full
/// `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDeal {
    pub id: String,
    pub deal_name: String,
    pub close_date: String,
    pub segment: String,
    pub acv: Decimal,
    pub estimated_transactions_per_month: i64,
    pub deal_owner: String,
}

/// A deal expected to close in a specific quarter, with forecast fields for
/// the quarterly projection views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterDeal {
    pub id: String,
    pub client_name: String,
    pub deal_name: String,
    pub close_date: String,
    pub segment: String,
    pub acv: Decimal,
    pub arr_forecast: Decimal,
    pub annualized_transaction_forecast: i64,
    pub deal_owner: String,
    pub target_account: bool,
    pub latest_next_steps: String,
    pub confidence_quarter_close: u8,
}

/// The normalized bundle every source adapter produces: one JSON shape
/// regardless of whether the data came from the mock generator, a published
/// spreadsheet, or the HTTP API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDataBundle {
    #[serde(rename = "salesKPIs", default)]
    pub sales_kpis: Option<SalesKpis>,
    #[serde(default)]
    pub forecast_point: Vec<ForecastPoint>,
    #[serde(default)]
    pub forecast_point_by_segment: Vec<ForecastPointBySegment>,
    #[serde(default)]
    pub pipeline_stage: Vec<PipelineStage>,
    #[serde(default)]
    pub deal_segment: Vec<DealSegment>,
    #[serde(default)]
    pub arr_by_month_point: Vec<ArrByMonthPoint>,
    #[serde(default)]
    pub details_by_month: BTreeMap<String, ArrMonthDetail>,
    #[serde(default)]
    pub pipeline_deal: Vec<PipelineDeal>,
    #[serde(default)]
    pub acv_by_month: Vec<AcvByMonth>,
    #[serde(default)]
    pub client_wins_point: Vec<ClientWinsPoint>,
    #[serde(default)]
    pub client_deal: Vec<ClientDeal>,
    #[serde(default)]
    pub quarter_deal: Vec<QuarterDeal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kpi_wire_names_match_the_bundle_contract() {
        let kpis = SalesKpis {
            forecast_arr: dec!(2840000),
            pipeline_value: dec!(1920000),
            closed_won: 12,
            win_rate: dec!(34),
            forecast_arr_delta: Some(dec!(4.2)),
            pipeline_value_delta: Some(dec!(-2.1)),
            closed_won_delta: None,
            win_rate_delta: None,
        };
        let json = serde_json::to_value(&kpis).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("forecastARR"));
        assert!(obj.contains_key("pipelineValue"));
        assert!(obj.contains_key("closedWon"));
        assert!(obj.contains_key("winRate"));
        assert!(obj.contains_key("forecastARRDelta"));
        // Unset deltas are omitted, not serialized as null.
        assert!(!obj.contains_key("closedWonDelta"));
        assert_eq!(json["forecastARR"], serde_json::json!(2840000.0));
    }

    #[test]
    fn bundle_top_level_keys_match_the_contract() {
        let json = serde_json::to_value(SalesDataBundle::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "salesKPIs",
            "forecastPoint",
            "forecastPointBySegment",
            "pipelineStage",
            "dealSegment",
            "arrByMonthPoint",
            "detailsByMonth",
            "pipelineDeal",
            "acvByMonth",
            "clientWinsPoint",
            "clientDeal",
            "quarterDeal",
        ] {
            assert!(obj.contains_key(key), "missing bundle key {key}");
        }
    }

    #[test]
    fn acv_rollup_serializes_total_in_caps() {
        let point = AcvByMonth {
            month: "Jan 2026".into(),
            month_key: "2026-01".into(),
            total_acv: dec!(150000),
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["monthKey"], "2026-01");
        assert_eq!(json["totalACV"], serde_json::json!(150000.0));
    }

    #[test]
    fn bundle_roundtrips_through_json() {
        let bundle = SalesDataBundle {
            pipeline_deal: vec![PipelineDeal {
                id: "deal-1".into(),
                name: "Acme Corp – Platform".into(),
                acv: dec!(120000),
                close_date: "2026-03".into(),
                stage: None,
                segment: "Fintechs".into(),
            }],
            ..SalesDataBundle::default()
        };
        let text = serde_json::to_string(&bundle).unwrap();
        let back: SalesDataBundle = serde_json::from_str(&text).unwrap();
        assert_eq!(back, bundle);
        // A missing optional stage never serializes as null.
        assert!(!text.contains("\"stage\""));
    }
}
