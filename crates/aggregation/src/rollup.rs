use std::collections::BTreeMap;

use core_types::month;
use core_types::{AcvByMonth, ForecastPoint, ForecastPointBySegment, PipelineDeal};
use rust_decimal::Decimal;

/// The forecast-over-time window: a fiscal-year view from mid-year through
/// the first quarter of the next. Sources that carry no explicit window use
/// this one.
pub const DEFAULT_FORECAST_WINDOW: [&str; 9] = [
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar",
];

/// Sums pipeline ACV per close month.
///
/// Months with no deals are omitted from the output. Ordering is
/// lexicographic on the `YYYY-MM` key, which for well-formed keys is
/// chronological order; the display label is derived from the key and falls
/// back to echoing it when the key is unrecognizable.
pub fn acv_by_month(deals: &[PipelineDeal]) -> Vec<AcvByMonth> {
    let mut by_month: BTreeMap<&str, Decimal> = BTreeMap::new();
    for deal in deals {
        *by_month
            .entry(deal.close_date.as_str())
            .or_insert(Decimal::ZERO) += deal.acv;
    }
    by_month
        .into_iter()
        .map(|(key, total)| AcvByMonth {
            month: month::label_for_key(key),
            month_key: key.to_string(),
            total_acv: total,
        })
        .collect()
}

/// Groups deals by close month for drill-down views, each month's list
/// sorted by ACV descending.
pub fn deals_by_month(deals: &[PipelineDeal]) -> BTreeMap<String, Vec<PipelineDeal>> {
    let mut by_month: BTreeMap<String, Vec<PipelineDeal>> = BTreeMap::new();
    for deal in deals {
        by_month
            .entry(deal.close_date.clone())
            .or_default()
            .push(deal.clone());
    }
    for deals_in_month in by_month.values_mut() {
        deals_in_month.sort_by(|a, b| b.acv.cmp(&a.acv));
    }
    by_month
}

/// Aggregates the per-segment forecast rows into one forecast-vs-target point
/// per window month.
///
/// An empty `selected_segments` list means no segment filter. Unlike the ACV
/// rollup, this emits every window month; a month with no matching rows
/// shows an explicit zero, so the chart axis always spans the full window.
pub fn forecast_over_time(
    rows: &[ForecastPointBySegment],
    window: &[&str],
    selected_segments: &[&str],
) -> Vec<ForecastPoint> {
    let mut by_month: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for row in rows {
        if !selected_segments.is_empty() && !selected_segments.contains(&row.segment.as_str()) {
            continue;
        }
        let entry = by_month
            .entry(row.month.as_str())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += row.forecast;
        entry.1 += row.target;
    }
    window
        .iter()
        .map(|label| {
            let (forecast, target) = by_month
                .get(label)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            ForecastPoint {
                month: (*label).to_string(),
                forecast,
                target,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn deal(id: &str, acv: Decimal, close_date: &str) -> PipelineDeal {
        PipelineDeal {
            id: id.to_string(),
            name: format!("{id} deal"),
            acv,
            close_date: close_date.to_string(),
            stage: None,
            segment: "Fintechs".to_string(),
        }
    }

    #[test]
    fn sums_acv_per_month_and_omits_empty_months() {
        let deals = vec![
            deal("a", dec!(100), "2026-01"),
            deal("b", dec!(50), "2026-01"),
            deal("c", dec!(200), "2026-02"),
        ];
        let rollup = acv_by_month(&deals);
        assert_eq!(rollup.len(), 2);
        assert_eq!(rollup[0].month_key, "2026-01");
        assert_eq!(rollup[0].total_acv, dec!(150));
        assert_eq!(rollup[0].month, "Jan 2026");
        assert_eq!(rollup[1].month_key, "2026-02");
        assert_eq!(rollup[1].total_acv, dec!(200));
    }

    #[test]
    fn rollup_orders_chronologically_across_years() {
        let deals = vec![
            deal("a", dec!(10), "2026-02"),
            deal("b", dec!(20), "2025-12"),
            deal("c", dec!(30), "2026-01"),
        ];
        let rollup = acv_by_month(&deals);
        let keys: Vec<&str> = rollup.iter().map(|p| p.month_key.as_str()).collect();
        assert_eq!(keys, ["2025-12", "2026-01", "2026-02"]);
    }

    #[test]
    fn unknown_month_key_echoes_through_the_label() {
        let rollup = acv_by_month(&[deal("a", dec!(10), "H1-weird")]);
        assert_eq!(rollup[0].month, "H1-weird");
    }

    #[test]
    fn deals_by_month_sorts_each_month_by_acv_descending() {
        let grouped = deals_by_month(&[
            deal("small", dec!(40), "2026-03"),
            deal("big", dec!(400), "2026-03"),
            deal("other", dec!(70), "2026-04"),
        ]);
        let march: Vec<&str> = grouped["2026-03"].iter().map(|d| d.id.as_str()).collect();
        assert_eq!(march, ["big", "small"]);
        assert_eq!(grouped["2026-04"].len(), 1);
    }

    fn seg_row(month: &str, segment: &str, forecast: Decimal, target: Decimal) -> ForecastPointBySegment {
        ForecastPointBySegment {
            month: month.to_string(),
            segment: segment.to_string(),
            forecast,
            target,
        }
    }

    #[test]
    fn forecast_window_zero_fills_absent_months() {
        let rows = vec![
            seg_row("Jul", "Fintechs", dec!(100), dec!(120)),
            seg_row("Jul", "Gateways", dec!(50), dec!(60)),
            seg_row("Sep", "Fintechs", dec!(80), dec!(90)),
        ];
        let points = forecast_over_time(&rows, &["Jul", "Aug", "Sep"], &[]);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].forecast, dec!(150));
        assert_eq!(points[0].target, dec!(180));
        assert_eq!(points[1].forecast, Decimal::ZERO);
        assert_eq!(points[1].target, Decimal::ZERO);
        assert_eq!(points[2].forecast, dec!(80));
    }

    #[test]
    fn forecast_segment_filter_is_disjunctive_within_the_selection() {
        let rows = vec![
            seg_row("Jul", "Fintechs", dec!(100), dec!(100)),
            seg_row("Jul", "Gateways", dec!(50), dec!(50)),
            seg_row("Jul", "HVHM", dec!(25), dec!(25)),
        ];
        let points = forecast_over_time(&rows, &["Jul"], &["Fintechs", "HVHM"]);
        assert_eq!(points[0].forecast, dec!(125));
        // An empty selection means no filter at all.
        let unfiltered = forecast_over_time(&rows, &["Jul"], &[]);
        assert_eq!(unfiltered[0].forecast, dec!(175));
    }
}
