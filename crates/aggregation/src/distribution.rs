use std::collections::HashMap;

use core_types::{segment_fill, DealSegment, DealStage, PipelineDeal, PipelineStage, Segment};
use rust_decimal::Decimal;

use crate::rounding::round_whole;

/// Grouping label for deals whose stage is missing or blank.
pub const NO_STAGE: &str = "No stage";

/// Computes each category's integer-percentage share of the whole.
///
/// Shares are rounded independently, so they rarely sum to exactly 100; the
/// first category in presentation order absorbs the residual, which keeps the
/// displayed total at exactly 100 for any non-empty input. A zero total
/// yields all-zero shares instead of dividing by zero.
///
/// Presentation order: categories from the canonical segment list first, in
/// that list's order, then any ad-hoc categories alphabetically.
pub fn distribution_of<T>(
    items: &[T],
    category: impl Fn(&T) -> String,
    measure: impl Fn(&T) -> Decimal,
) -> Vec<DealSegment> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for item in items {
        let name = category(item);
        if !totals.contains_key(&name) {
            order.push(name.clone());
        }
        *totals.entry(name).or_insert(Decimal::ZERO) += measure(item);
    }

    let mut known: Vec<String> = Vec::new();
    let mut ad_hoc: Vec<String> = Vec::new();
    for name in order {
        match Segment::position(&name) {
            Some(_) => known.push(name),
            None => ad_hoc.push(name),
        }
    }
    known.sort_by_key(|name| Segment::position(name));
    ad_hoc.sort();
    known.extend(ad_hoc);

    let rows: Vec<(String, Decimal)> = known
        .into_iter()
        .map(|name| {
            let total = totals[&name];
            (name, total)
        })
        .collect();
    share_out(rows)
}

/// Re-normalizes stored distribution rows against a segment selection.
///
/// An empty selection keeps every row. The surviving rows are re-shared so
/// they again total 100, with the first row absorbing the rounding residual;
/// stored fills are kept, missing fills fall back to the canonical palette.
pub fn deal_distribution(segments: &[DealSegment], selected: &[&str]) -> Vec<DealSegment> {
    let rows: Vec<(String, Decimal)> = segments
        .iter()
        .filter(|s| selected.is_empty() || selected.contains(&s.name.as_str()))
        .map(|s| (s.name.clone(), s.value))
        .collect();
    let mut shared = share_out(rows);
    // Preserve whatever fill the source carried for each surviving row.
    for row in &mut shared {
        if let Some(original) = segments.iter().find(|s| s.name == row.name) {
            if !original.fill.is_empty() {
                row.fill = original.fill.clone();
            }
        }
    }
    shared
}

/// Groups pipeline deals by stage into total ACV and deal count per stage.
///
/// Known stages come first in funnel order; ad-hoc stage names (including the
/// "No stage" bucket for blank stages) follow alphabetically.
pub fn pipeline_by_stage(deals: &[PipelineDeal]) -> Vec<PipelineStage> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (Decimal, u32)> = HashMap::new();
    for deal in deals {
        let stage = match deal.stage.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => NO_STAGE.to_string(),
        };
        if !totals.contains_key(&stage) {
            order.push(stage.clone());
        }
        let entry = totals.entry(stage).or_insert((Decimal::ZERO, 0));
        entry.0 += deal.acv;
        entry.1 += 1;
    }

    let mut stages: Vec<PipelineStage> = order
        .into_iter()
        .map(|name| {
            let (value, count) = totals[&name];
            PipelineStage { name, value, count }
        })
        .collect();
    stages.sort_by(|a, b| {
        match (DealStage::position(&a.name), DealStage::position(&b.name)) {
            (Some(ai), Some(bi)) => ai.cmp(&bi),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        }
    });
    stages
}

/// Shares the measures out as integer percentages totaling exactly 100.
fn share_out(rows: Vec<(String, Decimal)>) -> Vec<DealSegment> {
    let total: Decimal = rows.iter().map(|(_, measure)| *measure).sum();
    let mut shared: Vec<DealSegment> = rows
        .into_iter()
        .enumerate()
        .map(|(position, (name, measure))| {
            let value = if total > Decimal::ZERO {
                round_whole(measure / total * Decimal::ONE_HUNDRED)
            } else {
                Decimal::ZERO
            };
            let fill = segment_fill(&name, position).to_string();
            DealSegment { name, value, fill }
        })
        .collect();
    if total > Decimal::ZERO && !shared.is_empty() {
        let sum: Decimal = shared.iter().map(|s| s.value).sum();
        if sum != Decimal::ONE_HUNDRED {
            shared[0].value += Decimal::ONE_HUNDRED - sum;
        }
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn seg(name: &str, value: Decimal) -> DealSegment {
        DealSegment {
            name: name.to_string(),
            value,
            fill: String::new(),
        }
    }

    #[test]
    fn equal_thirds_repair_credits_the_first_row() {
        let rows = vec![seg("A", dec!(33)), seg("B", dec!(33)), seg("C", dec!(33))];
        let shared = deal_distribution(&rows, &[]);
        let values: Vec<Decimal> = shared.iter().map(|s| s.value).collect();
        assert_eq!(values, [dec!(34), dec!(33), dec!(33)]);
        let total: Decimal = shared.iter().map(|s| s.value).sum();
        assert_eq!(total, dec!(100));
    }

    #[test]
    fn every_nonempty_distribution_totals_one_hundred() {
        let cases: Vec<Vec<DealSegment>> = vec![
            vec![seg("A", dec!(1)), seg("B", dec!(1)), seg("C", dec!(1)), seg("D", dec!(1)), seg("E", dec!(3))],
            vec![seg("A", dec!(17)), seg("B", dec!(5))],
            vec![seg("A", dec!(99.5)), seg("B", dec!(0.5))],
        ];
        for rows in cases {
            let total: Decimal = deal_distribution(&rows, &[])
                .iter()
                .map(|s| s.value)
                .sum();
            assert_eq!(total, dec!(100));
        }
    }

    #[test]
    fn zero_total_yields_all_zero_shares() {
        let rows = vec![seg("A", dec!(0)), seg("B", dec!(0))];
        let shared = deal_distribution(&rows, &[]);
        assert!(shared.iter().all(|s| s.value == Decimal::ZERO));
    }

    #[test]
    fn selection_renormalizes_the_survivors() {
        let rows = vec![seg("Fintechs", dec!(40)), seg("Gateways", dec!(40)), seg("HVHM", dec!(20))];
        let shared = deal_distribution(&rows, &["Fintechs", "HVHM"]);
        assert_eq!(shared.len(), 2);
        assert_eq!(shared[0].value, dec!(67));
        assert_eq!(shared[1].value, dec!(33));
    }

    #[test]
    fn distribution_orders_known_segments_before_adhoc() {
        struct Row(&'static str, Decimal);
        let rows = vec![
            Row("Zebra Accounts", dec!(10)),
            Row("HVHM", dec!(10)),
            Row("Bank & Bank Tech", dec!(10)),
            Row("Alpha Accounts", dec!(10)),
        ];
        let shared = distribution_of(&rows, |r| r.0.to_string(), |r| r.1);
        let names: Vec<&str> = shared.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Bank & Bank Tech", "HVHM", "Alpha Accounts", "Zebra Accounts"]
        );
    }

    fn staged(id: &str, acv: Decimal, stage: Option<&str>) -> PipelineDeal {
        PipelineDeal {
            id: id.to_string(),
            name: id.to_string(),
            acv,
            close_date: "2026-01".to_string(),
            stage: stage.map(str::to_string),
            segment: "Fintechs".to_string(),
        }
    }

    #[test]
    fn stage_grouping_orders_funnel_first_and_buckets_blanks() {
        let deals = vec![
            staged("a", dec!(100), Some("Negotiation")),
            staged("b", dec!(50), Some("Qualification")),
            staged("c", dec!(25), None),
            staged("d", dec!(30), Some("  ")),
            staged("e", dec!(10), Some("Custom stage")),
            staged("f", dec!(40), Some("Qualification")),
        ];
        let stages = pipeline_by_stage(&deals);
        let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Qualification", "Negotiation", "Custom stage", NO_STAGE]);
        assert_eq!(stages[0].value, dec!(90));
        assert_eq!(stages[0].count, 2);
        assert_eq!(stages[3].value, dec!(55));
        assert_eq!(stages[3].count, 2);
    }
}
