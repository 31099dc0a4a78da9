//! Month-key handling shared by the rollups and the display layer.
//!
//! Dates travel through the system as plain strings (`YYYY-MM` keys or
//! `YYYY-MM-DD` dates); lexicographic order on those keys is chronological
//! order, so nothing here needs a calendar library.

/// Short month names in calendar order, used for display labels.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Turns a `YYYY-MM` month key into its display label, e.g. `"2026-01"` into
/// `"Jan 2026"`. A key that does not look like `YYYY-MM` is echoed back
/// unchanged so unknown keys still render.
pub fn label_for_key(key: &str) -> String {
    if let (Some(year), Some("-"), Some(month)) = (key.get(0..4), key.get(4..5), key.get(5..7)) {
        if key.len() == 7 && year.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(m @ 1..=12) = month.parse::<usize>() {
                return format!("{} {}", MONTH_NAMES[m - 1], year);
            }
        }
    }
    key.to_string()
}

/// Calendar month number (1-12) from a `YYYY-MM` or `YYYY-MM-DD` date string.
pub fn month_number(date: &str) -> Option<u32> {
    let m = date.get(5..7)?.parse::<u32>().ok()?;
    (1..=12).contains(&m).then_some(m)
}

/// Month index (0-11) from a period label like `"Jan 2026"` or a bare `"Feb"`.
pub fn month_index_from_period(period: &str) -> Option<usize> {
    let name = period.split_whitespace().next()?;
    MONTH_NAMES.iter().position(|m| *m == name)
}

/// Short month name for a 1-based calendar month number.
pub fn month_name(number: u32) -> Option<&'static str> {
    let idx = number.checked_sub(1)? as usize;
    MONTH_NAMES.get(idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_known_month_keys() {
        assert_eq!(label_for_key("2026-01"), "Jan 2026");
        assert_eq!(label_for_key("2025-12"), "Dec 2025");
    }

    #[test]
    fn echoes_unknown_keys() {
        assert_eq!(label_for_key("2026-13"), "2026-13");
        assert_eq!(label_for_key("H1 2026"), "H1 2026");
        assert_eq!(label_for_key(""), "");
    }

    #[test]
    fn month_number_reads_both_date_shapes() {
        assert_eq!(month_number("2026-04"), Some(4));
        assert_eq!(month_number("2026-04-17"), Some(4));
        assert_eq!(month_number("2026-00"), None);
        assert_eq!(month_number("garbage"), None);
    }

    #[test]
    fn period_labels_resolve_with_or_without_year() {
        assert_eq!(month_index_from_period("Jan 2026"), Some(0));
        assert_eq!(month_index_from_period("Dec"), Some(11));
        assert_eq!(month_index_from_period("Quarter 1"), None);
    }
}
