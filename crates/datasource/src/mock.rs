use std::collections::BTreeMap;

use aggregation::{acv_by_month, forecast_over_time, DEFAULT_FORECAST_WINDOW};
use async_trait::async_trait;
use core_types::month::MONTH_NAMES;
use core_types::{
    segment_fill, ArrByMonthPoint, ArrLicenseItem, ArrMinimumItem, ArrMonthDetail, ArrVolumeItem,
    ClientDeal, ClientWinsPoint, DealSegment, ForecastPointBySegment, PipelineDeal, PipelineStage,
    QuarterDeal, SalesDataBundle, SalesKpis, Segment,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::SourceError;
use crate::SalesDataSource;

const SAMPLE_CLIENTS: [&str; 10] = [
    "Acme Corp",
    "Beta Inc",
    "Gamma Ltd",
    "Delta Solutions",
    "Epsilon Group",
    "Zeta Industries",
    "Eta Partners",
    "Theta Systems",
    "Iota Consulting",
    "Kappa Finance",
];

const DEAL_NAMES: [&str; 15] = [
    "Acme Corp – Platform",
    "Beta Inc – Enterprise",
    "Gamma Ltd – Standard",
    "Delta Solutions – Premium",
    "Epsilon Group – Platform",
    "Zeta Industries – Enterprise",
    "Eta Partners – Standard",
    "Theta Systems – Premium",
    "Iota Consulting – Platform",
    "Kappa Finance – Enterprise",
    "Lambda Tech – Standard",
    "Mu Industries – Premium",
    "Nu Ventures – Platform",
    "Xi Corp – Enterprise",
    "Omicron Ltd – Standard",
];

const DEAL_NAME_PREFIXES: [&str; 12] = [
    "Acme Corp",
    "Beta Inc",
    "Gamma Ltd",
    "Delta Solutions",
    "Epsilon Group",
    "Zeta Industries",
    "Eta Partners",
    "Theta Systems",
    "Iota Consulting",
    "Kappa Finance",
    "Lambda Tech",
    "Mu Industries",
];

const DEAL_OWNERS: [&str; 5] = [
    "Alex Morgan",
    "Jordan Smith",
    "Sam Taylor",
    "Casey Lee",
    "Riley Brown",
];

const DEAL_VARIANTS: [&str; 4] = ["Platform", "Enterprise", "Standard", "Premium"];

const PIPELINE_STAGES_FOR_DEALS: [&str; 3] = ["Proposal", "Negotiation", "Closed Won"];

const NEXT_STEPS_SAMPLES: [&str; 12] = [
    "Follow-up call scheduled for next week. Awaiting legal review of MSA.",
    "Demo completed. Sending pricing proposal and scheduling QBR.",
    "Contract sent for signature. Chasing procurement for approval.",
    "Discovery call done. Preparing ROI deck and technical deep-dive.",
    "Waiting on budget confirmation. Next: intro to technical lead.",
    "Proposal under review. Follow-up in 5 days if no response.",
    "Kick-off meeting booked. Pending security questionnaire.",
    "Renewal discussion scheduled. Preparing usage report.",
    "POC extended by 2 weeks. Success criteria agreed.",
    "Final negotiation. Discussing volume discounts and payment terms.",
    "Stakeholder alignment meeting next Tuesday. Draft SOW shared.",
    "Champion left company. Re-engaging with new decision maker.",
];

/// Each segment's share of the aggregate forecast.
const SEGMENT_SHARES: [f64; 5] = [0.28, 0.24, 0.18, 0.18, 0.12];

/// In-process deterministic data source: generates a plausible full bundle
/// from an explicit seed. The same seed always produces the same bundle,
/// which keeps mock-backed sessions and tests reproducible.
pub struct MockSource {
    seed: u64,
    modeled_year: u16,
}

impl MockSource {
    pub fn new(seed: u64, modeled_year: u16) -> Self {
        MockSource { seed, modeled_year }
    }
}

#[async_trait]
impl SalesDataSource for MockSource {
    async fn load(&self) -> Result<SalesDataBundle, SourceError> {
        Ok(generate(self.seed, self.modeled_year))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Generates the whole bundle. Derived collections (`forecastPoint`,
/// `acvByMonth`) are computed through the aggregation crate rather than
/// generated a second time, so they are consistent by construction.
pub fn generate(seed: u64, year: u16) -> SalesDataBundle {
    let mut rng = StdRng::seed_from_u64(seed);

    let forecast_point_by_segment = forecast_by_segment(&mut rng);
    let forecast_point = forecast_over_time(
        &forecast_point_by_segment,
        &DEFAULT_FORECAST_WINDOW,
        &[],
    );
    let (arr_by_month_point, details_by_month) = arr_with_details(&mut rng);
    let deal_segment = segment_distribution(&mut rng);
    let pipeline_deal = pipeline_deals(&mut rng, year);
    let acv = acv_by_month(&pipeline_deal);
    let client_wins_point = client_wins(&mut rng, year);
    let client_deal = client_deals(&mut rng, year);
    let quarter_deal = quarter_deals(&mut rng, year);

    SalesDataBundle {
        sales_kpis: Some(kpi_snapshot()),
        forecast_point,
        forecast_point_by_segment,
        pipeline_stage: pipeline_stages(),
        deal_segment,
        arr_by_month_point,
        details_by_month,
        pipeline_deal,
        acv_by_month: acv,
        client_wins_point,
        client_deal,
        quarter_deal,
    }
}

fn kpi_snapshot() -> SalesKpis {
    SalesKpis {
        forecast_arr: dec!(2840000),
        pipeline_value: dec!(1920000),
        closed_won: 12,
        win_rate: dec!(34),
        forecast_arr_delta: Some(dec!(4.2)),
        pipeline_value_delta: Some(dec!(-2.1)),
        closed_won_delta: Some(dec!(1)),
        win_rate_delta: Some(dec!(2.5)),
    }
}

fn pipeline_stages() -> Vec<PipelineStage> {
    [
        ("Qualification", 420_000, 18),
        ("Discovery", 380_000, 12),
        ("Proposal", 520_000, 8),
        ("Negotiation", 350_000, 5),
        ("Closed Won", 250_000, 4),
    ]
    .into_iter()
    .map(|(name, value, count)| PipelineStage {
        name: name.to_string(),
        value: Decimal::from(value),
        count,
    })
    .collect()
}

/// Builds the 9-month forecast window per segment: a drifting aggregate base
/// split by fixed share-of-total weights with a deterministic per-segment
/// variance.
fn forecast_by_segment(rng: &mut StdRng) -> Vec<ForecastPointBySegment> {
    let mut rows = Vec::with_capacity(DEFAULT_FORECAST_WINDOW.len() * Segment::ALL.len());
    let mut base_forecast: i64 = 2_100_000;
    let mut base_target: i64 = 2_400_000;
    for (m, label) in DEFAULT_FORECAST_WINDOW.iter().enumerate() {
        base_forecast += rng.gen_range(80_000..=180_000);
        if m % 3 == 0 {
            base_target = (base_target as f64 * 1.02).round() as i64;
        }
        for (s, segment) in Segment::ALL.iter().enumerate() {
            let variance = 0.92 + ((s * 17) % 100) as f64 / 500.0;
            let target_tilt = if s % 2 == 0 { 1.01 } else { 0.99 };
            rows.push(ForecastPointBySegment {
                month: (*label).to_string(),
                segment: segment.to_string(),
                forecast: Decimal::from(
                    (base_forecast as f64 * SEGMENT_SHARES[s] * variance).round() as i64,
                ),
                target: Decimal::from(
                    (base_target as f64 * SEGMENT_SHARES[s] * target_tilt).round() as i64,
                ),
            });
        }
    }
    rows
}

/// Splits `total` into `parts` random whole amounts that sum exactly back.
fn split_amount(rng: &mut StdRng, total: i64, parts: usize) -> Vec<i64> {
    if parts <= 1 {
        return vec![total];
    }
    let mut out = Vec::with_capacity(parts);
    let mut remaining = total;
    for i in 0..parts - 1 {
        let max = remaining / (parts - i) as i64;
        let low = (max as f64 * 0.3).floor() as i64;
        let value = rng.gen_range(low..=max.max(low));
        out.push(value);
        remaining -= value;
    }
    out.push(remaining);
    out
}

/// Monthly ARR totals plus the client-level detail behind them. The detail
/// amounts sum exactly to the month totals: the volume-driven total is taken
/// from the generated items (transactions × price point), not the other way
/// around.
fn arr_with_details(rng: &mut StdRng) -> (Vec<ArrByMonthPoint>, BTreeMap<String, ArrMonthDetail>) {
    let mut chart = Vec::with_capacity(12);
    let mut details = BTreeMap::new();

    for (month_idx, label) in MONTH_NAMES.iter().enumerate() {
        let license: i64 = rng.gen_range(80..=220) * 1000;
        let minimum: i64 = rng.gen_range(40..=120) * 1000;
        let volume_driven: i64 = rng.gen_range(20..=100) * 1000;

        let license_parts = {
            let parts = rng.gen_range(2..=4);
            split_amount(rng, license, parts)
        };
        let minimum_parts = {
            let parts = rng.gen_range(2..=4);
            split_amount(rng, minimum, parts)
        };
        let volume_parts = {
            let parts = rng.gen_range(2..=4);
            split_amount(rng, volume_driven, parts)
        };

        let license_items: Vec<ArrLicenseItem> = license_parts
            .iter()
            .enumerate()
            .map(|(i, amount)| ArrLicenseItem {
                client_name: SAMPLE_CLIENTS[(month_idx + i) % SAMPLE_CLIENTS.len()].to_string(),
                amount: Decimal::from(*amount),
                segment: random_segment(rng),
            })
            .collect();
        let minimum_items: Vec<ArrMinimumItem> = minimum_parts
            .iter()
            .enumerate()
            .map(|(i, amount)| ArrMinimumItem {
                client_name: SAMPLE_CLIENTS[(month_idx + i + 2) % SAMPLE_CLIENTS.len()].to_string(),
                amount: Decimal::from(*amount),
                segment: random_segment(rng),
            })
            .collect();
        let volume_items: Vec<ArrVolumeItem> = volume_parts
            .iter()
            .enumerate()
            .map(|(i, amount)| {
                let price_point: i64 = rng.gen_range(5..=50);
                let transactions = (amount / price_point).max(1);
                ArrVolumeItem {
                    client_name: SAMPLE_CLIENTS[(month_idx + i + 4) % SAMPLE_CLIENTS.len()]
                        .to_string(),
                    transactions,
                    price_point: Decimal::from(price_point),
                    amount: Decimal::from(transactions * price_point),
                    segment: random_segment(rng),
                }
            })
            .collect();

        let volume_total: Decimal = volume_items.iter().map(|item| item.amount).sum();
        chart.push(ArrByMonthPoint {
            month: (*label).to_string(),
            license: Decimal::from(license),
            minimum: Decimal::from(minimum),
            volume_driven: volume_total,
        });
        details.insert(
            (*label).to_string(),
            ArrMonthDetail {
                license: license_items,
                minimum: minimum_items,
                volume_driven: volume_items,
            },
        );
    }

    (chart, details)
}

/// Random integer percentages for the five segments that sum to exactly 100,
/// with the first segment absorbing the rounding residual.
fn segment_distribution(rng: &mut StdRng) -> Vec<DealSegment> {
    let raw: Vec<f64> = Segment::ALL.iter().map(|_| rng.gen_range(0.0..1.0)).collect();
    let sum: f64 = raw.iter().sum();
    let mut scaled: Vec<i64> = raw.iter().map(|r| (r / sum * 100.0).round() as i64).collect();
    let diff = 100 - scaled.iter().sum::<i64>();
    if diff != 0 {
        scaled[0] = (scaled[0] + diff).max(0);
    }
    Segment::ALL
        .iter()
        .enumerate()
        .map(|(i, segment)| DealSegment {
            name: segment.to_string(),
            value: Decimal::from(scaled[i]),
            fill: segment_fill(segment.as_str(), i).to_string(),
        })
        .collect()
}

/// Open deals with close dates across the modeled year, one to four per
/// month.
fn pipeline_deals(rng: &mut StdRng, year: u16) -> Vec<PipelineDeal> {
    let mut deals = Vec::new();
    let mut id = 1;
    for month_num in 1..=12u32 {
        let close_date = format!("{year}-{month_num:02}");
        let count = rng.gen_range(1..=4);
        for i in 0..count {
            let base_name = *DEAL_NAMES.choose(rng).unwrap_or(&DEAL_NAMES[0]);
            let name = if count > 1 && i > 0 {
                format!("{base_name} – {close_date}")
            } else {
                base_name.to_string()
            };
            deals.push(PipelineDeal {
                id: format!("deal-{id}"),
                name,
                acv: Decimal::from(rng.gen_range(40_000..=280_000i64)),
                close_date: close_date.clone(),
                stage: PIPELINE_STAGES_FOR_DEALS
                    .choose(rng)
                    .map(|s| s.to_string()),
                segment: random_segment(rng),
            });
            id += 1;
        }
    }
    deals
}

fn client_wins(rng: &mut StdRng, year: u16) -> Vec<ClientWinsPoint> {
    MONTH_NAMES
        .iter()
        .map(|name| ClientWinsPoint {
            period: format!("{name} {year}"),
            wins: rng.gen_range(1..=8),
        })
        .collect()
}

/// Client deal rows on a deterministic date lattice spanning the modeled year
/// and the one before it, sorted by close date.
fn client_deals(rng: &mut StdRng, year: u16) -> Vec<ClientDeal> {
    let mut deals: Vec<ClientDeal> = (0..48)
        .map(|i| {
            let prefix = DEAL_NAME_PREFIXES[i % DEAL_NAME_PREFIXES.len()];
            let suffix = if i > 11 {
                format!(" – {}", DEAL_VARIANTS[i % DEAL_VARIANTS.len()])
            } else {
                String::new()
            };
            let day = 1 + (i % 28);
            let month_num = (i % 12) + 1;
            let deal_year = if i >= 24 { year } else { year - 1 };
            ClientDeal {
                id: format!("client-deal-{}", i + 1),
                deal_name: format!("{prefix}{suffix}"),
                close_date: format!("{deal_year}-{month_num:02}-{day:02}"),
                segment: random_segment(rng),
                acv: Decimal::from(rng.gen_range(30..=350i64) * 1000),
                estimated_transactions_per_month: rng.gen_range(500..=50_000),
                deal_owner: DEAL_OWNERS[i % DEAL_OWNERS.len()].to_string(),
            }
        })
        .collect();
    deals.sort_by(|a, b| a.close_date.cmp(&b.close_date));
    deals
}

/// Six to fourteen deals per quarter, each closing inside its quarter's
/// months, sorted by close date within the quarter.
fn quarter_deals(rng: &mut StdRng, year: u16) -> Vec<QuarterDeal> {
    let mut all = Vec::new();
    for quarter in 1..=4u8 {
        let months: [u32; 3] = {
            let first = (u32::from(quarter) - 1) * 3 + 1;
            [first, first + 1, first + 2]
        };
        let count = rng.gen_range(6..=14);
        let mut deals = Vec::with_capacity(count);
        for i in 0..count {
            let client_name = DEAL_NAME_PREFIXES[i % DEAL_NAME_PREFIXES.len()];
            let month_num = months[rng.gen_range(0..months.len())];
            let day: u32 = rng.gen_range(1..=28);
            let acv: i64 = rng.gen_range(40..=320) * 1000;
            let arr_forecast = (acv as f64 * rng.gen_range(0.85..=1.15)).round() as i64;
            deals.push(QuarterDeal {
                id: format!("quarter-deal-{year}Q{quarter}-{}", i + 1),
                client_name: client_name.to_string(),
                deal_name: format!(
                    "{client_name} – {}",
                    DEAL_VARIANTS[i % DEAL_VARIANTS.len()]
                ),
                close_date: format!("{year}-{month_num:02}-{day:02}"),
                segment: random_segment(rng),
                acv: Decimal::from(acv),
                arr_forecast: Decimal::from(arr_forecast),
                annualized_transaction_forecast: rng.gen_range(6_000..=480_000),
                deal_owner: DEAL_OWNERS[i % DEAL_OWNERS.len()].to_string(),
                target_account: rng.gen_range(0.0..1.0) > 0.4,
                latest_next_steps: NEXT_STEPS_SAMPLES[i % NEXT_STEPS_SAMPLES.len()].to_string(),
                confidence_quarter_close: rng.gen_range(25..=95),
            });
        }
        deals.sort_by(|a, b| a.close_date.cmp(&b.close_date));
        all.extend(deals);
    }
    all
}

fn random_segment(rng: &mut StdRng) -> String {
    Segment::ALL
        .choose(rng)
        .unwrap_or(&Segment::ALL[0])
        .to_string()
}
