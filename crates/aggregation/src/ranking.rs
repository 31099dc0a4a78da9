use std::collections::HashMap;

use rust_decimal::Decimal;

/// Accumulates a numeric measure per key (typically client name), preserving
/// first-encounter order so that ties rank stably.
///
/// Besides the top-N view itself, callers need the per-key totals and the
/// grand total to express each top entry as a share of the whole, so both are
/// exposed directly.
#[derive(Debug, Default)]
pub struct ClientRollup {
    order: Vec<String>,
    totals: HashMap<String, Decimal>,
}

impl ClientRollup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rollup from any record slice with a key and a measure.
    pub fn from_items<T>(
        items: &[T],
        key: impl Fn(&T) -> &str,
        measure: impl Fn(&T) -> Decimal,
    ) -> Self {
        let mut rollup = Self::new();
        for item in items {
            rollup.add(key(item), measure(item));
        }
        rollup
    }

    pub fn add(&mut self, key: &str, amount: Decimal) {
        if !self.totals.contains_key(key) {
            self.order.push(key.to_string());
        }
        *self.totals.entry(key.to_string()).or_insert(Decimal::ZERO) += amount;
    }

    /// Summed measure for one key; zero for keys never seen.
    pub fn total_for(&self, key: &str) -> Decimal {
        self.totals.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum across all keys.
    pub fn grand_total(&self) -> Decimal {
        self.totals.values().copied().sum()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All keys ranked by summed measure, descending; equal measures keep
    /// their first-encounter order (the sort is stable).
    pub fn ranked(&self) -> Vec<(String, Decimal)> {
        let mut rows: Vec<(String, Decimal)> = self
            .order
            .iter()
            .map(|key| (key.clone(), self.totals[key]))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }

    /// The `n` keys with the largest summed measure.
    pub fn top_n(&self, n: usize) -> Vec<(String, Decimal)> {
        let mut rows = self.ranked();
        rows.truncate(n);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> ClientRollup {
        let mut rollup = ClientRollup::new();
        rollup.add("Acme Corp", dec!(100));
        rollup.add("Beta Inc", dec!(250));
        rollup.add("Acme Corp", dec!(75));
        rollup.add("Gamma Ltd", dec!(40));
        rollup.add("Delta Solutions", dec!(175));
        rollup
    }

    #[test]
    fn ranks_descending_by_summed_measure() {
        let top = sample().top_n(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], ("Beta Inc".to_string(), dec!(250)));
        assert_eq!(top[1].1, dec!(175));
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let mut rollup = ClientRollup::new();
        rollup.add("Second", dec!(10));
        rollup.add("First", dec!(50));
        rollup.add("Third", dec!(10));
        let ranked = rollup.ranked();
        assert_eq!(ranked[0].0, "First");
        assert_eq!(ranked[1].0, "Second");
        assert_eq!(ranked[2].0, "Third");
    }

    #[test]
    fn top_n_is_capped_by_distinct_keys() {
        let rollup = sample();
        assert_eq!(rollup.top_n(10).len(), 4);
        assert_eq!(rollup.len(), 4);
    }

    #[test]
    fn keys_outside_top_n_never_exceed_the_cutoff() {
        let rollup = sample();
        let top = rollup.top_n(2);
        let cutoff = top.last().unwrap().1;
        for (key, total) in rollup.ranked().into_iter().skip(2) {
            assert!(total <= cutoff, "{key} exceeds the cutoff");
        }
    }

    #[test]
    fn totals_support_share_of_whole() {
        let rollup = sample();
        assert_eq!(rollup.grand_total(), dec!(640));
        assert_eq!(rollup.total_for("Acme Corp"), dec!(175));
        assert_eq!(rollup.total_for("Nobody"), Decimal::ZERO);
    }
}
