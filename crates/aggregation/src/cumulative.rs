use core_types::{AcvByMonth, ClientWinsPoint};
use rust_decimal::Decimal;

/// Running-sum view of the monthly ACV rollup: same length and labels, each
/// point carrying the sum of everything up to and including it.
///
/// This transform is not idempotent: applying it twice double-counts, so a
/// render path must apply it at most once, right before display.
pub fn cumulative_acv(points: &[AcvByMonth]) -> Vec<AcvByMonth> {
    let mut sum = Decimal::ZERO;
    points
        .iter()
        .map(|p| {
            sum += p.total_acv;
            AcvByMonth {
                month: p.month.clone(),
                month_key: p.month_key.clone(),
                total_acv: sum,
            }
        })
        .collect()
}

/// Running-sum view of client wins per period.
pub fn cumulative_wins(points: &[ClientWinsPoint]) -> Vec<ClientWinsPoint> {
    let mut sum = 0u32;
    points
        .iter()
        .map(|p| {
            sum += p.wins;
            ClientWinsPoint {
                period: p.period.clone(),
                wins: sum,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn points(values: &[Decimal]) -> Vec<AcvByMonth> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| AcvByMonth {
                month_key: format!("2026-{:02}", i + 1),
                month: format!("month {i}"),
                total_acv: *v,
            })
            .collect()
    }

    #[test]
    fn output_is_prefix_sums_with_labels_preserved() {
        let input = points(&[dec!(100), dec!(50), dec!(200)]);
        let out = cumulative_acv(&input);
        assert_eq!(out.len(), input.len());
        let totals: Vec<Decimal> = out.iter().map(|p| p.total_acv).collect();
        assert_eq!(totals, [dec!(100), dec!(150), dec!(350)]);
        assert_eq!(out[2].month_key, "2026-03");
        assert_eq!(out[2].month, "month 2");
    }

    #[test]
    fn nonnegative_input_gives_a_nondecreasing_series() {
        let out = cumulative_acv(&points(&[dec!(5), dec!(0), dec!(12), dec!(0.5)]));
        for window in out.windows(2) {
            assert!(window[1].total_acv >= window[0].total_acv);
        }
    }

    #[test]
    fn applying_twice_is_not_the_same_as_once() {
        let input = points(&[dec!(10), dec!(20)]);
        let once = cumulative_acv(&input);
        let twice = cumulative_acv(&once);
        assert_ne!(once, twice);
        assert_eq!(twice[1].total_acv, dec!(40));
    }

    #[test]
    fn wins_accumulate_per_period() {
        let input = vec![
            ClientWinsPoint { period: "Jan 2026".into(), wins: 3 },
            ClientWinsPoint { period: "Feb 2026".into(), wins: 5 },
        ];
        let out = cumulative_wins(&input);
        assert_eq!(out[1].wins, 8);
        assert_eq!(out[1].period, "Feb 2026");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(cumulative_acv(&[]).is_empty());
        assert!(cumulative_wins(&[]).is_empty());
    }
}
