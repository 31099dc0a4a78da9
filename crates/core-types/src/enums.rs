use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::month;

/// The fixed chart palette for segment fills, indexed by canonical segment
/// position.
pub const SEGMENT_PALETTE: [&str; 6] = [
    "#1e1b4b", "#3730a3", "#0ea5e9", "#38bdf8", "#7dd3fc", "#bae6fd",
];

/// The five market segments every deal and client is classified into.
///
/// Records carry segments as free-form strings (a spreadsheet can always ship
/// a category nobody planned for); this enum is the canonical vocabulary used
/// for presentation order, fill colors, and mock generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    BankAndBankTech,
    Fintechs,
    Gateways,
    LargeMerchants,
    Hvhm,
}

impl Segment {
    /// Canonical presentation order for segment groupings and filters.
    pub const ALL: [Segment; 5] = [
        Segment::BankAndBankTech,
        Segment::Fintechs,
        Segment::Gateways,
        Segment::LargeMerchants,
        Segment::Hvhm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::BankAndBankTech => "Bank & Bank Tech",
            Segment::Fintechs => "Fintechs",
            Segment::Gateways => "Gateways",
            Segment::LargeMerchants => "Large Merchants",
            Segment::Hvhm => "HVHM",
        }
    }

    /// Position of a segment name in the canonical order, `None` for ad-hoc
    /// category names.
    pub fn position(name: &str) -> Option<usize> {
        Segment::ALL.iter().position(|s| s.as_str() == name)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill color for a category row: known segments take their canonical palette
/// slot, ad-hoc categories cycle the palette by presentation position.
pub fn segment_fill(name: &str, position: usize) -> &'static str {
    let idx = Segment::position(name).unwrap_or(position);
    SEGMENT_PALETTE[idx % SEGMENT_PALETTE.len()]
}

/// Pipeline stages in funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStage {
    Qualification,
    Discovery,
    Proposal,
    Negotiation,
    ClosedWon,
}

impl DealStage {
    pub const ALL: [DealStage; 5] = [
        DealStage::Qualification,
        DealStage::Discovery,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::ClosedWon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Qualification => "Qualification",
            DealStage::Discovery => "Discovery",
            DealStage::Proposal => "Proposal",
            DealStage::Negotiation => "Negotiation",
            DealStage::ClosedWon => "Closed Won",
        }
    }

    /// Funnel position of a stage name, `None` for stages outside the fixed
    /// vocabulary.
    pub fn position(name: &str) -> Option<usize> {
        DealStage::ALL.iter().position(|s| s.as_str() == name)
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar quarter of the modeled year, parsed from ids like `"2026Q1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quarter {
    year: u16,
    number: u8,
}

impl Quarter {
    pub fn new(year: u16, number: u8) -> Result<Self, CoreError> {
        if !(1..=4).contains(&number) {
            return Err(CoreError::InvalidQuarter(format!("{year}Q{number}")));
        }
        Ok(Quarter { year, number })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// The three calendar month numbers (1-12) this quarter covers.
    pub fn months(&self) -> [u32; 3] {
        let first = (u32::from(self.number) - 1) * 3 + 1;
        [first, first + 1, first + 2]
    }

    /// Short display labels for the quarter's months, e.g. `["Jan", "Feb", "Mar"]`.
    pub fn month_labels(&self) -> [&'static str; 3] {
        let [a, b, c] = self.months();
        [
            month::month_name(a).unwrap_or(""),
            month::month_name(b).unwrap_or(""),
            month::month_name(c).unwrap_or(""),
        ]
    }

    /// The quarters of the same year that precede this one, in order.
    pub fn preceding(&self) -> Vec<Quarter> {
        (1..self.number)
            .map(|number| Quarter { year: self.year, number })
            .collect()
    }

    /// True when a `YYYY-MM` / `YYYY-MM-DD` close date falls in one of this
    /// quarter's months. Deliberately month-only: the upstream store keys all
    /// quarter deals to the modeled year already.
    pub fn contains_month(&self, close_date: &str) -> bool {
        match month::month_number(close_date) {
            Some(m) => self.months().contains(&m),
            None => false,
        }
    }

    pub fn id(&self) -> String {
        format!("{}Q{}", self.year, self.number)
    }
}

impl FromStr for Quarter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidQuarter(s.to_string());
        let (year, number) = s.split_once(['Q', 'q']).ok_or_else(invalid)?;
        if year.len() != 4 {
            return Err(invalid());
        }
        let year: u16 = year.parse().map_err(|_| invalid())?;
        let number: u8 = number.parse().map_err(|_| invalid())?;
        Quarter::new(year, number).map_err(|_| invalid())
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_parses_valid_ids() {
        let q = "2026Q3".parse::<Quarter>().unwrap();
        assert_eq!(q.year(), 2026);
        assert_eq!(q.number(), 3);
        assert_eq!(q.months(), [7, 8, 9]);
        assert_eq!(q.month_labels(), ["Jul", "Aug", "Sep"]);
        assert_eq!(q.id(), "2026Q3");
    }

    #[test]
    fn quarter_rejects_malformed_ids() {
        for bad in ["2026Q5", "2026Q0", "26Q1", "2026-Q1", "Q1", "garbage", ""] {
            assert!(bad.parse::<Quarter>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn quarter_membership_is_month_based() {
        let q2 = "2026Q2".parse::<Quarter>().unwrap();
        assert!(q2.contains_month("2026-04-09"));
        assert!(q2.contains_month("2026-06"));
        assert!(!q2.contains_month("2026-07-01"));
        assert!(!q2.contains_month("not-a-date"));
    }

    #[test]
    fn preceding_quarters_in_order() {
        let q4 = "2026Q4".parse::<Quarter>().unwrap();
        let ids: Vec<String> = q4.preceding().iter().map(Quarter::id).collect();
        assert_eq!(ids, ["2026Q1", "2026Q2", "2026Q3"]);
        assert!("2026Q1".parse::<Quarter>().unwrap().preceding().is_empty());
    }

    #[test]
    fn segment_fill_cycles_for_adhoc_categories() {
        assert_eq!(segment_fill("Bank & Bank Tech", 4), SEGMENT_PALETTE[0]);
        assert_eq!(segment_fill("HVHM", 0), SEGMENT_PALETTE[4]);
        assert_eq!(segment_fill("Crypto", 1), SEGMENT_PALETTE[1]);
        assert_eq!(segment_fill("Crypto", 7), SEGMENT_PALETTE[1]);
    }
}
