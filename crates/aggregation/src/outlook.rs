use core_types::month;
use core_types::{ArrByMonthPoint, ClientWinsPoint, PipelineDeal};
use rust_decimal::Decimal;
use serde::Serialize;

/// Metric plotted in the cumulative actual-vs-forecast outlook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlookMetric {
    Acv,
    InYearRevenue,
    ArrTarget,
    ClientWins,
}

/// One month of the cumulative outlook.
///
/// The actual series is populated only through the as-of month and the
/// forecast series only from the as-of month onward, so a chart can draw the
/// solid actual line up to the cutoff and the dashed forecast line after it,
/// with the two meeting at the cutoff point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookPoint {
    pub month: String,
    pub month_index: u32,
    pub target_cumulative: Decimal,
    pub actual_cumulative: Option<Decimal>,
    pub forecast_cumulative: Option<Decimal>,
}

/// Row-level inputs for the outlook; which slice is read depends on the
/// metric.
#[derive(Debug, Clone, Copy)]
pub struct OutlookInputs<'a> {
    pub pipeline_deals: &'a [PipelineDeal],
    pub arr_by_month: &'a [ArrByMonthPoint],
    pub client_wins: &'a [ClientWinsPoint],
}

/// Builds the twelve-month cumulative outlook for one metric.
///
/// Items dated on or before the as-of cutoff count as actual/signed, later
/// items as forecast. The cumulative target line is the annual target spread
/// linearly across the year.
pub fn cumulative_outlook(
    inputs: &OutlookInputs<'_>,
    metric: OutlookMetric,
    modeled_year: u16,
    as_of_month: u32,
    annual_target: Decimal,
) -> Vec<OutlookPoint> {
    let mut actual = [Decimal::ZERO; 12];
    let mut forecast = [Decimal::ZERO; 12];

    match metric {
        OutlookMetric::Acv => {
            // Deals carry full close dates; compare against the end of the
            // as-of month so everything inside it counts as signed.
            let cutoff = format!("{modeled_year}-{as_of_month:02}-31");
            for deal in inputs.pipeline_deals {
                let Some(m) = month::month_number(&deal.close_date) else {
                    continue;
                };
                let slot = (m - 1) as usize;
                if deal.close_date.as_str() <= cutoff.as_str() {
                    actual[slot] += deal.acv;
                } else {
                    forecast[slot] += deal.acv;
                }
            }
        }
        OutlookMetric::ClientWins => {
            for point in inputs.client_wins {
                let slot = month::month_index_from_period(&point.period).unwrap_or(0);
                let wins = Decimal::from(point.wins);
                if (slot as u32) + 1 <= as_of_month {
                    actual[slot] += wins;
                } else {
                    forecast[slot] += wins;
                }
            }
        }
        OutlookMetric::InYearRevenue | OutlookMetric::ArrTarget => {
            for row in inputs.arr_by_month {
                let slot = month::month_index_from_period(&row.month).unwrap_or(0);
                let value = row.license + row.minimum + row.volume_driven;
                if (slot as u32) + 1 <= as_of_month {
                    actual[slot] += value;
                } else {
                    forecast[slot] += value;
                }
            }
        }
    }

    let mut rows = Vec::with_capacity(12);
    let mut actual_cum = Decimal::ZERO;
    let mut forecast_cum = Decimal::ZERO;
    for slot in 0..12usize {
        let month_index = slot as u32 + 1;
        let in_actual_period = month_index <= as_of_month;
        if in_actual_period {
            // Inside the actual window everything booked for the month counts
            // as actual, and the forecast line starts from that same level.
            actual_cum += actual[slot] + forecast[slot];
            forecast_cum = actual_cum;
        } else {
            forecast_cum += forecast[slot];
        }
        rows.push(OutlookPoint {
            month: month::MONTH_NAMES[slot].to_string(),
            month_index,
            target_cumulative: annual_target * Decimal::from(month_index) / Decimal::from(12u32),
            actual_cumulative: in_actual_period.then_some(actual_cum),
            forecast_cumulative: (month_index >= as_of_month).then_some(forecast_cum),
        });
    }
    rows
}
