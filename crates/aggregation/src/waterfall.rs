use core_types::month;
use core_types::{Quarter, QuarterDeal};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::rounding::{round_to_thousand, round_whole};

/// Metric plotted in the quarterly projection waterfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMetric {
    ClientWins,
    Acv,
    InYearRevenue,
}

impl ProjectionMetric {
    /// A deal's contribution to the metric; for client wins every deal counts
    /// once.
    pub fn value_of(&self, deal: &QuarterDeal) -> Decimal {
        match self {
            ProjectionMetric::ClientWins => Decimal::ONE,
            ProjectionMetric::Acv => deal.acv,
            ProjectionMetric::InYearRevenue => deal.arr_forecast,
        }
    }

    /// Count metrics round their targets to whole numbers; currency metrics
    /// round to the nearest thousand.
    pub fn is_count(&self) -> bool {
        matches!(self, ProjectionMetric::ClientWins)
    }
}

/// The fixed full-quarter targets, one value per metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarterTarget {
    pub client_wins: Decimal,
    pub acv: Decimal,
    pub in_year_revenue: Decimal,
}

impl QuarterTarget {
    pub fn for_metric(&self, metric: ProjectionMetric) -> Decimal {
        match metric {
            ProjectionMetric::ClientWins => self.client_wins,
            ProjectionMetric::Acv => self.acv,
            ProjectionMetric::InYearRevenue => self.in_year_revenue,
        }
    }
}

/// One bar of the quarterly waterfall. Month bars stack `signed` and
/// `forecasted` on top of `baseline` (the running total so far), so
/// consecutive bars connect visually; the summary and target bars sit on a
/// zero baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallRow {
    pub name: String,
    pub baseline: Decimal,
    pub signed: Decimal,
    pub forecasted: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Decimal>,
    pub is_total: bool,
    pub is_target: bool,
}

impl WaterfallRow {
    fn bar(name: &str, baseline: Decimal, signed: Decimal, forecasted: Decimal) -> Self {
        WaterfallRow {
            name: name.to_string(),
            baseline,
            signed,
            forecasted,
            target: None,
            is_total: false,
            is_target: false,
        }
    }
}

/// Inputs for one waterfall computation. `deals` and `prior_deals` arrive
/// with any user sub-filters already applied; `unfiltered_deals` is the same
/// quarter without filters and only feeds the target-scaling denominator.
#[derive(Debug, Clone, Copy)]
pub struct WaterfallInputs<'a> {
    pub quarter: Quarter,
    pub deals: &'a [QuarterDeal],
    pub unfiltered_deals: &'a [QuarterDeal],
    pub prior_deals: &'a [QuarterDeal],
    /// `YYYY-MM-DD` cutoff splitting signed from forecasted.
    pub as_of_date: &'a str,
    pub metric: ProjectionMetric,
    pub target: QuarterTarget,
    /// True when a segment/owner sub-filter is active; scales the target bar
    /// down to the filtered population's share of the quarter.
    pub filter_active: bool,
}

/// Builds the ordered bar sequence for a quarter: optional carry-over, one
/// bar per month with a running baseline, a "Total Projected" summary bar,
/// and the target bar.
pub fn quarter_waterfall(inputs: &WaterfallInputs<'_>) -> Vec<WaterfallRow> {
    let metric = inputs.metric;
    let months = inputs.quarter.months();
    let mut month_signed = [Decimal::ZERO; 3];
    let mut month_forecasted = [Decimal::ZERO; 3];

    for (slot, month_num) in months.iter().enumerate() {
        for deal in inputs.deals {
            if month::month_number(&deal.close_date) != Some(*month_num) {
                continue;
            }
            let value = metric.value_of(deal);
            if deal.close_date.as_str() <= inputs.as_of_date {
                month_signed[slot] += value;
            } else {
                month_forecasted[slot] += value;
            }
        }
    }

    let total_signed: Decimal = month_signed.iter().copied().sum();
    let total_forecasted: Decimal = month_forecasted.iter().copied().sum();
    let quarter_total = total_signed + total_forecasted;
    let unfiltered_total: Decimal = inputs
        .unfiltered_deals
        .iter()
        .map(|d| metric.value_of(d))
        .sum();

    let full_target = inputs.target.for_metric(metric);
    let scaled_target = if inputs.filter_active && unfiltered_total > Decimal::ZERO {
        full_target * (quarter_total / unfiltered_total)
    } else {
        full_target
    };
    let target_value = if metric.is_count() {
        round_whole(scaled_target)
    } else {
        round_to_thousand(scaled_target)
    };

    let carry_over: Decimal = inputs
        .prior_deals
        .iter()
        .filter(|d| d.close_date.as_str() <= inputs.as_of_date)
        .map(|d| metric.value_of(d))
        .sum();

    let mut rows = Vec::with_capacity(6);
    let mut running = Decimal::ZERO;

    if inputs.quarter.number() > 1 && carry_over > Decimal::ZERO {
        rows.push(WaterfallRow::bar(
            "Carry-over",
            Decimal::ZERO,
            carry_over,
            Decimal::ZERO,
        ));
        running = carry_over;
    }

    let labels = inputs.quarter.month_labels();
    for slot in 0..3 {
        rows.push(WaterfallRow::bar(
            labels[slot],
            running,
            month_signed[slot],
            month_forecasted[slot],
        ));
        running += month_signed[slot] + month_forecasted[slot];
    }

    rows.push(WaterfallRow {
        is_total: true,
        ..WaterfallRow::bar("Total Projected", Decimal::ZERO, total_signed, total_forecasted)
    });

    let target_label = if inputs.quarter.number() == 1 {
        "Q1 Target".to_string()
    } else {
        format!("{} Target", inputs.quarter.id())
    };
    rows.push(WaterfallRow {
        name: target_label,
        baseline: Decimal::ZERO,
        signed: Decimal::ZERO,
        forecasted: Decimal::ZERO,
        target: Some(target_value),
        is_total: false,
        is_target: true,
    });

    rows
}

/// The bundle's quarter deals that close inside `quarter`.
pub fn quarter_deals(all: &[QuarterDeal], quarter: Quarter) -> Vec<QuarterDeal> {
    all.iter()
        .filter(|d| quarter.contains_month(&d.close_date))
        .cloned()
        .collect()
}

/// Deals from every quarter preceding `quarter` in the same year, in quarter
/// order.
pub fn preceding_quarter_deals(all: &[QuarterDeal], quarter: Quarter) -> Vec<QuarterDeal> {
    quarter
        .preceding()
        .into_iter()
        .flat_map(|q| quarter_deals(all, q))
        .collect()
}
