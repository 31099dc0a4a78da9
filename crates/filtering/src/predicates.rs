use rust_decimal::Decimal;
use std::str::FromStr;

/// Case-insensitive substring match on trimmed input. Blank input passes
/// everything.
pub fn text_contains(query: &str, value: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    value.to_lowercase().contains(&query.to_lowercase())
}

/// Disjunctive membership within one multi-select dimension. An empty
/// selection imposes no constraint.
pub fn multi_select_matches(selected: &[String], value: &str) -> bool {
    selected.is_empty() || selected.iter().any(|s| s == value)
}

/// Single-value exact match; blank input passes everything.
pub fn exact_matches(wanted: &str, value: &str) -> bool {
    wanted.is_empty() || wanted == value
}

/// Parses a numeric bound from raw user input. Blank or unparseable input is
/// "no bound", never a match failure.
pub fn parse_bound(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw).ok()
}

/// Range check against raw min/max inputs; each side only applies when it
/// parses.
pub fn within_range(min_raw: &str, max_raw: &str, value: Decimal) -> bool {
    if let Some(min) = parse_bound(min_raw) {
        if value < min {
            return false;
        }
    }
    if let Some(max) = parse_bound(max_raw) {
        if value > max {
            return false;
        }
    }
    true
}
