use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use configuration::SheetsConfig;
use core_types::{
    ArrByMonthPoint, ArrLicenseItem, ArrMinimumItem, ArrMonthDetail, ArrVolumeItem, AcvByMonth,
    ClientDeal, ClientWinsPoint, DealSegment, ForecastPoint, ForecastPointBySegment, PipelineDeal,
    PipelineStage, QuarterDeal, SalesDataBundle, SalesKpis,
};
use futures::future::join_all;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::SourceError;
use crate::SalesDataSource;

/// A parsed CSV row, keyed by the header row's column names.
type Row = HashMap<String, String>;

/// Loads the bundle from a spreadsheet published to the web: one CSV export
/// per logical sheet, addressed by the spreadsheet id and the tab's gid.
///
/// Parsing is deliberately schema-light: headers are read positionally from
/// the first line and cells are coerced best-effort (unparseable numbers
/// become 0, booleans recognize "true"/"1"/"yes"/"x"). A sheet that fails to
/// fetch degrades to an empty collection; only a completely unconfigured
/// source fails the load.
pub struct SheetsSource {
    config: SheetsConfig,
    client: reqwest::Client,
}

impl SheetsSource {
    pub fn new(config: SheetsConfig) -> Self {
        SheetsSource {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url_for(&self, gid: &str) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
            self.config.spreadsheet_id, gid
        )
    }

    async fn fetch_sheet(&self, name: &str) -> Result<Vec<Row>, SourceError> {
        let gid = match self.config.sheet_gids.get(name) {
            Some(gid) if !gid.is_empty() => gid,
            // A sheet with no published gid is simply absent.
            _ => return Ok(Vec::new()),
        };
        let url = self.url_for(gid);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16(), name.to_string()));
        }
        let text = response.text().await?;
        parse_rows(&text)
    }

    /// Per-sheet degradation rule: a failed sheet becomes an empty
    /// collection, never a failed load.
    async fn sheet(&self, name: &str) -> Vec<Row> {
        match self.fetch_sheet(name).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(sheet = name, error = %err, "sheet fetch failed, continuing with empty rows");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl SalesDataSource for SheetsSource {
    async fn load(&self) -> Result<SalesDataBundle, SourceError> {
        if !self.config.is_configured() {
            return Err(SourceError::NotConfigured(
                "sheets.spreadsheet_id or sheet_gids missing".to_string(),
            ));
        }

        let names = [
            "SalesKPIs",
            "ForecastPoint",
            "ForecastPointBySegment",
            "PipelineStage",
            "DealSegment",
            "ARRByMonthPoint",
            "ARR_LicenseDetail",
            "ARR_MinimumDetail",
            "ARR_VolumeDetail",
            "PipelineDeal",
            "ACVByMonth",
            "ClientWinsPoint",
            "ClientDeal",
            "QuarterDeal",
        ];
        let fetched = join_all(names.iter().map(|name| self.sheet(name))).await;
        let mut sheets = fetched.into_iter();
        let mut next = move || sheets.next().unwrap_or_default();

        let kpi_rows = next();
        let forecast_rows = next();
        let forecast_seg_rows = next();
        let stage_rows = next();
        let segment_rows = next();
        let arr_rows = next();
        let license_rows = next();
        let minimum_rows = next();
        let volume_rows = next();
        let deal_rows = next();
        let acv_rows = next();
        let wins_rows = next();
        let client_rows = next();
        let quarter_rows = next();

        Ok(SalesDataBundle {
            sales_kpis: kpi_rows.first().map(|row| SalesKpis {
                forecast_arr: num(row, "forecastARR"),
                pipeline_value: num(row, "pipelineValue"),
                closed_won: uint(row, "closedWon"),
                win_rate: num(row, "winRate"),
                forecast_arr_delta: opt_num(row, "forecastARRDelta"),
                pipeline_value_delta: opt_num(row, "pipelineValueDelta"),
                closed_won_delta: opt_num(row, "closedWonDelta"),
                win_rate_delta: opt_num(row, "winRateDelta"),
            }),
            forecast_point: forecast_rows
                .iter()
                .map(|row| ForecastPoint {
                    month: text(row, "month"),
                    forecast: num(row, "forecast"),
                    target: num(row, "target"),
                })
                .collect(),
            forecast_point_by_segment: forecast_seg_rows
                .iter()
                .map(|row| ForecastPointBySegment {
                    month: text(row, "month"),
                    segment: text(row, "segment"),
                    forecast: num(row, "forecast"),
                    target: num(row, "target"),
                })
                .collect(),
            pipeline_stage: stage_rows
                .iter()
                .map(|row| PipelineStage {
                    name: text(row, "name"),
                    value: num(row, "value"),
                    count: uint(row, "count"),
                })
                .collect(),
            deal_segment: segment_rows
                .iter()
                .map(|row| DealSegment {
                    name: text(row, "name"),
                    value: num(row, "value"),
                    fill: {
                        let fill = text(row, "fill");
                        if fill.is_empty() {
                            core_types::SEGMENT_PALETTE[0].to_string()
                        } else {
                            fill
                        }
                    },
                })
                .collect(),
            arr_by_month_point: arr_rows
                .iter()
                .map(|row| ArrByMonthPoint {
                    month: text(row, "month"),
                    license: num(row, "license"),
                    minimum: num(row, "minimum"),
                    volume_driven: num(row, "volumeDriven"),
                })
                .collect(),
            details_by_month: details_by_month(&license_rows, &minimum_rows, &volume_rows),
            pipeline_deal: deal_rows
                .iter()
                .map(|row| PipelineDeal {
                    id: text(row, "id"),
                    name: text(row, "name"),
                    acv: num(row, "acv"),
                    close_date: text(row, "closeDate"),
                    stage: opt_text(row, "stage"),
                    segment: text(row, "segment"),
                })
                .collect(),
            acv_by_month: acv_rows
                .iter()
                .map(|row| AcvByMonth {
                    month: text(row, "month"),
                    month_key: text(row, "monthKey"),
                    total_acv: num(row, "totalACV"),
                })
                .collect(),
            client_wins_point: wins_rows
                .iter()
                .map(|row| ClientWinsPoint {
                    period: text(row, "period"),
                    wins: uint(row, "wins"),
                })
                .collect(),
            client_deal: client_rows
                .iter()
                .map(|row| ClientDeal {
                    id: text(row, "id"),
                    deal_name: text(row, "dealName"),
                    close_date: text(row, "closeDate"),
                    segment: text(row, "segment"),
                    acv: num(row, "acv"),
                    estimated_transactions_per_month: int(row, "estimatedTransactionsPerMonth"),
                    deal_owner: text(row, "dealOwner"),
                })
                .collect(),
            quarter_deal: quarter_rows
                .iter()
                .map(|row| QuarterDeal {
                    id: text(row, "id"),
                    client_name: text(row, "clientName"),
                    deal_name: text(row, "dealName"),
                    close_date: text(row, "closeDate"),
                    segment: text(row, "segment"),
                    acv: num(row, "acv"),
                    arr_forecast: num(row, "arrForecast"),
                    annualized_transaction_forecast: int(row, "annualizedTransactionForecast"),
                    deal_owner: text(row, "dealOwner"),
                    target_account: boolean(row, "targetAccount"),
                    latest_next_steps: text(row, "latestNextSteps"),
                    confidence_quarter_close: percent(row, "confidenceQuarterClose"),
                })
                .collect(),
        })
    }

    fn name(&self) -> &'static str {
        "sheets"
    }
}

/// Parses a published CSV export into header-keyed rows. Headers come
/// positionally from the first line; a short record's missing cells coerce to
/// empty strings.
fn parse_rows(text: &str) -> Result<Vec<Row>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (idx, header) in headers.iter().enumerate() {
            row.insert(
                header.clone(),
                record.get(idx).unwrap_or("").trim().to_string(),
            );
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Groups the three ARR detail sheets by month label.
fn details_by_month(
    license_rows: &[Row],
    minimum_rows: &[Row],
    volume_rows: &[Row],
) -> BTreeMap<String, ArrMonthDetail> {
    let months: BTreeSet<String> = license_rows
        .iter()
        .chain(minimum_rows)
        .chain(volume_rows)
        .map(|row| text(row, "month"))
        .filter(|month| !month.is_empty())
        .collect();

    months
        .into_iter()
        .map(|month| {
            let detail = ArrMonthDetail {
                license: license_rows
                    .iter()
                    .filter(|row| text(row, "month") == month)
                    .map(|row| ArrLicenseItem {
                        client_name: text(row, "clientName"),
                        amount: num(row, "amount"),
                        segment: text(row, "segment"),
                    })
                    .collect(),
                minimum: minimum_rows
                    .iter()
                    .filter(|row| text(row, "month") == month)
                    .map(|row| ArrMinimumItem {
                        client_name: text(row, "clientName"),
                        amount: num(row, "amount"),
                        segment: text(row, "segment"),
                    })
                    .collect(),
                volume_driven: volume_rows
                    .iter()
                    .filter(|row| text(row, "month") == month)
                    .map(|row| ArrVolumeItem {
                        client_name: text(row, "clientName"),
                        transactions: int(row, "transactions"),
                        price_point: num(row, "pricePoint"),
                        amount: num(row, "amount"),
                        segment: text(row, "segment"),
                    })
                    .collect(),
            };
            (month, detail)
        })
        .collect()
}

fn field<'a>(row: &'a Row, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

fn text(row: &Row, key: &str) -> String {
    field(row, key).to_string()
}

fn opt_text(row: &Row, key: &str) -> Option<String> {
    let value = field(row, key);
    (!value.is_empty()).then(|| value.to_string())
}

/// Best-effort numeric coercion: keeps digits, dot and minus, and anything
/// still unparseable becomes zero rather than an error.
fn num(row: &Row, key: &str) -> Decimal {
    let cleaned: String = field(row, key)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

fn opt_num(row: &Row, key: &str) -> Option<Decimal> {
    (!field(row, key).is_empty()).then(|| num(row, key))
}

fn int(row: &Row, key: &str) -> i64 {
    num(row, key).trunc().to_i64().unwrap_or(0)
}

fn uint(row: &Row, key: &str) -> u32 {
    int(row, key).clamp(0, i64::from(u32::MAX)) as u32
}

fn percent(row: &Row, key: &str) -> u8 {
    int(row, key).clamp(0, 100) as u8
}

fn boolean(row: &Row, key: &str) -> bool {
    matches!(
        field(row, key).to_lowercase().as_str(),
        "true" | "1" | "yes" | "x"
    )
}
