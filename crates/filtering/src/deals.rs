use core_types::{ClientDeal, QuarterDeal};
use rust_decimal::Decimal;

use crate::predicates::{exact_matches, multi_select_matches, text_contains, within_range};

/// The accounts-table filter set. Numeric bounds are carried as the raw user
/// input; an unparseable bound simply deactivates that side of the range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilters {
    /// Free-text substring match on the deal name.
    pub deal_name: String,
    /// Exact close month (`YYYY-MM`), matched against the date's month prefix.
    pub close_month: String,
    /// Multi-select segments; empty selects all.
    pub segments: Vec<String>,
    pub acv_min: String,
    pub acv_max: String,
    pub transactions_min: String,
    pub transactions_max: String,
    /// Exact deal owner; empty selects all.
    pub deal_owner: String,
}

impl AccountFilters {
    /// Whether one deal passes every active dimension.
    pub fn matches(&self, deal: &ClientDeal) -> bool {
        if !text_contains(&self.deal_name, &deal.deal_name) {
            return false;
        }
        if !self.close_month.is_empty() {
            let deal_month = deal.close_date.get(0..7).unwrap_or("");
            if deal_month != self.close_month {
                return false;
            }
        }
        if !multi_select_matches(&self.segments, &deal.segment) {
            return false;
        }
        if !within_range(&self.acv_min, &self.acv_max, deal.acv) {
            return false;
        }
        if !within_range(
            &self.transactions_min,
            &self.transactions_max,
            Decimal::from(deal.estimated_transactions_per_month),
        ) {
            return false;
        }
        exact_matches(&self.deal_owner, &deal.deal_owner)
    }

    /// The deals passing the filter, in their original order.
    pub fn retain(&self, deals: &[ClientDeal]) -> Vec<ClientDeal> {
        deals.iter().filter(|d| self.matches(d)).cloned().collect()
    }
}

/// The quarter-view filter set: segment and owner multi-selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterFilters {
    pub segments: Vec<String>,
    pub owners: Vec<String>,
}

impl QuarterFilters {
    /// True when any dimension narrows the population (drives target scaling
    /// in the waterfall).
    pub fn is_active(&self) -> bool {
        !self.segments.is_empty() || !self.owners.is_empty()
    }

    pub fn matches(&self, deal: &QuarterDeal) -> bool {
        multi_select_matches(&self.segments, &deal.segment)
            && multi_select_matches(&self.owners, &deal.deal_owner)
    }

    pub fn retain(&self, deals: &[QuarterDeal]) -> Vec<QuarterDeal> {
        deals.iter().filter(|d| self.matches(d)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client_deal(name: &str, close_date: &str, segment: &str, acv: Decimal, txns: i64, owner: &str) -> ClientDeal {
        ClientDeal {
            id: format!("client-deal-{name}"),
            deal_name: name.to_string(),
            close_date: close_date.to_string(),
            segment: segment.to_string(),
            acv,
            estimated_transactions_per_month: txns,
            deal_owner: owner.to_string(),
        }
    }

    #[test]
    fn dimensions_are_conjunctive() {
        let deal = client_deal(
            "Acme Corp – Platform",
            "2026-03-14",
            "Fintechs",
            dec!(120000),
            8000,
            "Alex Morgan",
        );
        let mut filters = AccountFilters {
            deal_name: "acme".to_string(),
            segments: vec!["Fintechs".to_string()],
            ..AccountFilters::default()
        };
        assert!(filters.matches(&deal));

        // Adding one failing dimension fails the whole record.
        filters.deal_owner = "Jordan Smith".to_string();
        assert!(!filters.matches(&deal));
    }

    #[test]
    fn multi_select_is_disjunctive_and_empty_owner_is_unconstrained() {
        let a = client_deal("A", "2026-01-10", "Fintechs", dec!(1), 1, "Alex Morgan");
        let b = client_deal("B", "2026-01-10", "Gateways", dec!(1), 1, "Sam Taylor");
        let c = client_deal("C", "2026-01-10", "HVHM", dec!(1), 1, "Casey Lee");
        let filters = AccountFilters {
            segments: vec!["Fintechs".to_string(), "Gateways".to_string()],
            ..AccountFilters::default()
        };
        let kept = filters.retain(&[a, b, c]);
        let names: Vec<&str> = kept.iter().map(|d| d.deal_name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn close_month_matches_the_date_prefix() {
        let deal = client_deal("A", "2026-03-14", "Fintechs", dec!(1), 1, "Alex Morgan");
        let mut filters = AccountFilters {
            close_month: "2026-03".to_string(),
            ..AccountFilters::default()
        };
        assert!(filters.matches(&deal));
        filters.close_month = "2026-04".to_string();
        assert!(!filters.matches(&deal));
    }

    #[test]
    fn bad_numeric_input_never_fails_a_record() {
        let deal = client_deal("A", "2026-03-14", "Fintechs", dec!(90000), 700, "Alex Morgan");
        let filters = AccountFilters {
            acv_min: "not a number".to_string(),
            transactions_max: "".to_string(),
            ..AccountFilters::default()
        };
        assert!(filters.matches(&deal));

        let bounded = AccountFilters {
            acv_min: "100000".to_string(),
            ..AccountFilters::default()
        };
        assert!(!bounded.matches(&deal));
    }

    fn quarter_deal(segment: &str, owner: &str) -> QuarterDeal {
        QuarterDeal {
            id: "q".to_string(),
            client_name: "Acme Corp".to_string(),
            deal_name: "Acme Corp – Platform".to_string(),
            close_date: "2026-02-10".to_string(),
            segment: segment.to_string(),
            acv: dec!(100000),
            arr_forecast: dec!(95000),
            annualized_transaction_forecast: 40000,
            deal_owner: owner.to_string(),
            target_account: true,
            latest_next_steps: "Demo completed.".to_string(),
            confidence_quarter_close: 70,
        }
    }

    #[test]
    fn quarter_filters_combine_segments_and_owners() {
        let deal = quarter_deal("Gateways", "Riley Brown");
        let filters = QuarterFilters {
            segments: vec!["Gateways".to_string()],
            owners: vec!["Alex Morgan".to_string(), "Riley Brown".to_string()],
        };
        assert!(filters.is_active());
        assert!(filters.matches(&deal));

        let narrower = QuarterFilters {
            segments: vec!["Fintechs".to_string()],
            owners: filters.owners.clone(),
        };
        assert!(!narrower.matches(&deal));
        assert!(!QuarterFilters::default().is_active());
    }
}
