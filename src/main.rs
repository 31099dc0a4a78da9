use std::net::SocketAddr;

use aggregation::{
    acv_by_month, cumulative_acv, cumulative_outlook, deal_distribution, pipeline_by_stage,
    preceding_quarter_deals, quarter_deals, quarter_waterfall, ClientRollup, OutlookInputs,
    OutlookMetric, ProjectionMetric, QuarterTarget, WaterfallInputs,
};
use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Config;
use core_types::{Quarter, SalesDataBundle};
use datasource::SalesDataSource;
use filtering::QuarterFilters;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::info;
use web_server::AppState;

/// The main entry point for the quota sales-performance application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variable overrides from a .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments.
    let cli = Cli::parse();
    let config = configuration::load_config().context("failed to load configuration")?;

    // One load per session, from whichever adapter the config selects. A
    // failure here is terminal: there is no retry and no partial dashboard.
    let source = datasource::for_config(&config);
    info!(source = source.name(), "loading sales data");
    let bundle = source.load().await.context("sales data load failed")?;
    info!(
        pipeline_deals = bundle.pipeline_deal.len(),
        quarter_deals = bundle.quarter_deal.len(),
        client_deals = bundle.client_deal.len(),
        "sales data loaded"
    );

    match cli.command {
        Commands::Serve(args) => handle_serve(args, config, bundle, source.name()).await,
        Commands::Summary(args) => handle_summary(args, config, bundle),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Commercial-performance data core: loads one normalized sales bundle from
/// the configured source and serves or summarizes it.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the read-only sales data API over HTTP.
    Serve(ServeArgs),
    /// Print KPI, rollup, and projection tables to the terminal.
    Summary(SummaryArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Bind address override, e.g. 0.0.0.0:8080 (defaults to the config).
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser)]
struct SummaryArgs {
    /// Quarter to project, e.g. 2026Q2 (defaults to the modeled year's Q1).
    #[arg(long)]
    quarter: Option<String>,

    /// Restrict the projection to these segments (repeatable).
    #[arg(long = "segment")]
    segments: Vec<String>,

    /// Restrict the projection to these deal owners (repeatable).
    #[arg(long = "owner")]
    owners: Vec<String>,
}

// ==============================================================================
// Serve Command Logic
// ==============================================================================

async fn handle_serve(
    args: ServeArgs,
    config: Config,
    bundle: SalesDataBundle,
    source_name: &'static str,
) -> anyhow::Result<()> {
    let addr = match args.addr {
        Some(addr) => addr,
        None => format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .context("invalid server.host/server.port in configuration")?,
    };
    let state = AppState {
        bundle,
        source_name,
        modeled_year: config.as_of.modeled_year,
    };
    web_server::run_server(addr, state).await
}

// ==============================================================================
// Summary Command Logic
// ==============================================================================

/// Renders the dashboard's core numbers as terminal tables, running the whole
/// aggregation path end to end: KPIs, monthly ACV, segment distribution,
/// stage totals, the cumulative outlook, and one quarter's waterfall.
fn handle_summary(args: SummaryArgs, config: Config, bundle: SalesDataBundle) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let as_of_month = config.as_of.month_for(today);
    let as_of_date = config.as_of.date_for(today);
    let quarter: Quarter = args
        .quarter
        .unwrap_or_else(|| format!("{}Q1", config.as_of.modeled_year))
        .parse()?;

    print_kpis(&bundle);
    print_acv_rollup(&bundle);
    print_distribution(&bundle);
    print_stages(&bundle);
    print_outlook(&bundle, &config, as_of_month);
    print_waterfall(&bundle, &config, quarter, &as_of_date, &args.segments, &args.owners);

    Ok(())
}

fn print_kpis(bundle: &SalesDataBundle) {
    let Some(kpis) = &bundle.sales_kpis else {
        println!("No KPI snapshot in this bundle.");
        return;
    };
    let mut table = Table::new();
    table.set_header(vec!["KPI", "Value", "Delta"]);
    table.add_row(vec![
        "Forecast ARR".to_string(),
        format_currency(kpis.forecast_arr),
        format_delta(kpis.forecast_arr_delta),
    ]);
    table.add_row(vec![
        "Pipeline value".to_string(),
        format_currency(kpis.pipeline_value),
        format_delta(kpis.pipeline_value_delta),
    ]);
    table.add_row(vec![
        "Closed won".to_string(),
        kpis.closed_won.to_string(),
        format_delta(kpis.closed_won_delta),
    ]);
    table.add_row(vec![
        "Win rate".to_string(),
        format!("{}%", kpis.win_rate),
        format_delta(kpis.win_rate_delta),
    ]);
    println!("\nKPI snapshot\n{table}");
}

fn print_acv_rollup(bundle: &SalesDataBundle) {
    // Prefer the collection the source supplied; derive it from the deal rows
    // when absent.
    let rollup = if bundle.acv_by_month.is_empty() {
        acv_by_month(&bundle.pipeline_deal)
    } else {
        bundle.acv_by_month.clone()
    };
    let running = cumulative_acv(&rollup);

    let mut table = Table::new();
    table.set_header(vec!["Month", "Total ACV", "Cumulative"]);
    for (point, cumulative) in rollup.iter().zip(&running) {
        table.add_row(vec![
            point.month.clone(),
            format_currency(point.total_acv),
            format_currency(cumulative.total_acv),
        ]);
    }
    println!("\nForecast ACV by close month\n{table}");
}

fn print_distribution(bundle: &SalesDataBundle) {
    let shares = deal_distribution(&bundle.deal_segment, &[]);
    let mut table = Table::new();
    table.set_header(vec!["Segment", "Share"]);
    for share in &shares {
        table.add_row(vec![share.name.clone(), format!("{}%", share.value)]);
    }
    println!("\nDeal distribution\n{table}");
}

fn print_stages(bundle: &SalesDataBundle) {
    let stages = if bundle.pipeline_stage.is_empty() {
        pipeline_by_stage(&bundle.pipeline_deal)
    } else {
        bundle.pipeline_stage.clone()
    };
    let mut table = Table::new();
    table.set_header(vec!["Stage", "Value", "Deals"]);
    for stage in &stages {
        table.add_row(vec![
            stage.name.clone(),
            format_currency(stage.value),
            stage.count.to_string(),
        ]);
    }
    println!("\nPipeline by stage\n{table}");
}

fn print_outlook(bundle: &SalesDataBundle, config: &Config, as_of_month: u32) {
    let inputs = OutlookInputs {
        pipeline_deals: &bundle.pipeline_deal,
        arr_by_month: &bundle.arr_by_month_point,
        client_wins: &bundle.client_wins_point,
    };
    let rows = cumulative_outlook(
        &inputs,
        OutlookMetric::Acv,
        config.as_of.modeled_year,
        as_of_month,
        Decimal::from(config.targets.annual.acv),
    );

    let mut table = Table::new();
    table.set_header(vec!["Month", "Target (cum.)", "Actual (cum.)", "Forecast (cum.)"]);
    for row in &rows {
        table.add_row(vec![
            row.month.clone(),
            format_currency(row.target_cumulative),
            row.actual_cumulative.map(format_currency).unwrap_or_default(),
            row.forecast_cumulative.map(format_currency).unwrap_or_default(),
        ]);
    }
    println!("\nCumulative ACV vs target (as-of month {as_of_month})\n{table}");
}

fn print_waterfall(
    bundle: &SalesDataBundle,
    config: &Config,
    quarter: Quarter,
    as_of_date: &str,
    segments: &[String],
    owners: &[String],
) {
    let filters = QuarterFilters {
        segments: segments.to_vec(),
        owners: owners.to_vec(),
    };
    let in_quarter = quarter_deals(&bundle.quarter_deal, quarter);
    let deals = filters.retain(&in_quarter);
    let prior = filters.retain(&preceding_quarter_deals(&bundle.quarter_deal, quarter));

    let quarter_targets = config.targets.quarter(&quarter.id());
    let target = QuarterTarget {
        client_wins: Decimal::from(quarter_targets.client_wins),
        acv: Decimal::from(quarter_targets.acv),
        in_year_revenue: Decimal::from(quarter_targets.in_year_revenue),
    };

    let rows = quarter_waterfall(&WaterfallInputs {
        quarter,
        deals: &deals,
        unfiltered_deals: &in_quarter,
        prior_deals: &prior,
        as_of_date,
        metric: ProjectionMetric::Acv,
        target,
        filter_active: filters.is_active(),
    });

    let mut table = Table::new();
    table.set_header(vec!["Bar", "Baseline", "Signed", "Forecasted", "Target"]);
    for row in &rows {
        table.add_row(vec![
            row.name.clone(),
            format_currency(row.baseline),
            format_currency(row.signed),
            format_currency(row.forecasted),
            row.target.map(format_currency).unwrap_or_default(),
        ]);
    }
    println!("\nQuarterly projection for {} (signed through {as_of_date})\n{table}", quarter.id());

    let ranking = ClientRollup::from_items(&deals, |d| d.client_name.as_str(), |d| d.acv);
    let grand_total = ranking.grand_total();
    let mut clients = Table::new();
    clients.set_header(vec!["Client", "ACV", "Share"]);
    for (client, total) in ranking.top_n(10) {
        let share = if grand_total > Decimal::ZERO {
            (total / grand_total * Decimal::ONE_HUNDRED)
                .round_dp(1)
                .to_string()
        } else {
            "0".to_string()
        };
        clients.add_row(vec![client, format_currency(total), format!("{share}%")]);
    }
    println!("\nTop clients in {}\n{clients}", quarter.id());
}

// ==============================================================================
// Display helpers
// ==============================================================================

fn format_currency(value: Decimal) -> String {
    let v = value.to_f64().unwrap_or(0.0);
    if v >= 1_000_000.0 {
        format!("${:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("${:.0}K", v / 1_000.0)
    } else {
        format!("${v}")
    }
}

fn format_delta(delta: Option<Decimal>) -> String {
    match delta {
        Some(d) if d >= Decimal::ZERO => format!("↑ {d}%"),
        Some(d) => format!("↓ {}%", d.abs()),
        None => String::new(),
    }
}
