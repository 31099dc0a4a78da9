use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which source adapter feeds the session.
    pub source: SourceKind,
    pub server: ServerConfig,
    pub mock: MockConfig,
    pub sheets: SheetsConfig,
    pub api: ApiConfig,
    pub as_of: AsOfPolicy,
    pub targets: Targets,
}

/// The three interchangeable data sources, selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// In-process deterministic generator (the default for a bare checkout).
    #[default]
    Mock,
    /// Published-spreadsheet CSV export.
    Sheets,
    /// The SQL-backed HTTP API.
    Api,
}

/// Bind address for the read-only HTTP surface.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Parameters for the mock generator.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Explicit seed: the same seed always produces the same bundle, which is
    /// what makes mock-backed sessions reproducible.
    pub seed: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        MockConfig { seed: 20260 }
    }
}

/// Published-spreadsheet source settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// From the sheet URL: `.../d/THIS_PART/edit`.
    pub spreadsheet_id: String,
    /// Logical sheet name (e.g. "PipelineDeal") to the tab's published gid.
    pub sheet_gids: HashMap<String, String>,
}

impl SheetsConfig {
    pub fn is_configured(&self) -> bool {
        !self.spreadsheet_id.is_empty() && self.sheet_gids.values().any(|gid| !gid.is_empty())
    }
}

/// Upstream HTTP API settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the sales API, e.g. `http://localhost:3001`.
    pub base_url: String,
}

/// The as-of cutoff policy splitting signed from forecasted amounts.
///
/// This is a policy knob, not a derived fact: when the wall-clock year is not
/// the modeled year (running the dashboard against next year's plan in
/// December, say), the cutoff pins to `fallback_month` instead of chasing
/// today's date.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AsOfPolicy {
    pub modeled_year: u16,
    /// 1-12; used whenever the current year is not the modeled year.
    pub fallback_month: u32,
}

impl Default for AsOfPolicy {
    fn default() -> Self {
        AsOfPolicy {
            modeled_year: 2026,
            fallback_month: 2,
        }
    }
}

impl AsOfPolicy {
    /// The as-of month (1-12) for a given wall-clock date.
    pub fn month_for(&self, today: NaiveDate) -> u32 {
        if today.year() == i32::from(self.modeled_year) {
            today.month()
        } else {
            self.fallback_month
        }
    }

    /// The full `YYYY-MM-DD` as-of date for signed-vs-forecasted splits. In
    /// the fallback case the cutoff sits at the 28th, the last day every
    /// month has.
    pub fn date_for(&self, today: NaiveDate) -> String {
        if today.year() == i32::from(self.modeled_year) {
            today.format("%Y-%m-%d").to_string()
        } else {
            format!("{}-{:02}-28", self.modeled_year, self.fallback_month)
        }
    }
}

/// Annual targets for the cumulative outlook, per metric. Currency values in
/// whole dollars, wins in deals.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AnnualTargets {
    pub acv: i64,
    pub in_year_revenue: i64,
    pub arr: i64,
    pub client_wins: i64,
}

impl Default for AnnualTargets {
    fn default() -> Self {
        AnnualTargets {
            acv: 3_200_000,
            in_year_revenue: 2_800_000,
            arr: 2_900_000,
            client_wins: 52,
        }
    }
}

/// Fixed full-quarter targets for the projection waterfall.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct QuarterTargets {
    pub client_wins: i64,
    pub acv: i64,
    pub in_year_revenue: i64,
}

/// All target values, annual and per quarter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Targets {
    pub annual: AnnualTargets,
    /// Keyed by quarter id, e.g. "2026Q1".
    pub quarters: HashMap<String, QuarterTargets>,
}

impl Default for Targets {
    fn default() -> Self {
        let quarters = HashMap::from([
            ("2026Q1".to_string(), QuarterTargets { client_wins: 10, acv: 600_000, in_year_revenue: 550_000 }),
            ("2026Q2".to_string(), QuarterTargets { client_wins: 12, acv: 720_000, in_year_revenue: 660_000 }),
            ("2026Q3".to_string(), QuarterTargets { client_wins: 14, acv: 840_000, in_year_revenue: 770_000 }),
            ("2026Q4".to_string(), QuarterTargets { client_wins: 16, acv: 960_000, in_year_revenue: 880_000 }),
        ]);
        Targets {
            annual: AnnualTargets::default(),
            quarters,
        }
    }
}

impl Targets {
    /// Targets for one quarter; an unknown quarter id gets zero targets
    /// rather than an error.
    pub fn quarter(&self, id: &str) -> QuarterTargets {
        self.quarters.get(id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_of_follows_the_clock_inside_the_modeled_year() {
        let policy = AsOfPolicy::default();
        let in_year = NaiveDate::from_ymd_opt(2026, 7, 14).unwrap();
        assert_eq!(policy.month_for(in_year), 7);
        assert_eq!(policy.date_for(in_year), "2026-07-14");
    }

    #[test]
    fn as_of_pins_to_the_fallback_outside_the_modeled_year() {
        let policy = AsOfPolicy::default();
        let out_of_year = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        assert_eq!(policy.month_for(out_of_year), 2);
        assert_eq!(policy.date_for(out_of_year), "2026-02-28");
    }

    #[test]
    fn default_quarter_targets_cover_the_modeled_year() {
        let targets = Targets::default();
        assert_eq!(targets.quarter("2026Q1").acv, 600_000);
        assert_eq!(targets.quarter("2026Q4").client_wins, 16);
        assert_eq!(targets.quarter("2031Q1").acv, 0);
    }
}
