//! # Aggregation and derivation core
//!
//! Pure functions that turn raw entity collections into chart-ready series:
//! monthly rollups, category distributions, top-N rankings, cumulative
//! transforms, the actual-vs-forecast split, and quarterly waterfall rows.
//!
//! ## Architectural principles
//!
//! - **Pure logic only.** Nothing here touches the network, the clock, or any
//!   shared state. Every function maps immutable input slices to fresh output
//!   values, so re-filtering and re-aggregating is always a from-scratch
//!   re-run against the loaded dataset.
//! - **No error type.** Malformed rows degrade to safe defaults (a date that
//!   fails to parse simply contributes nothing); errors stop at the load
//!   boundary, not here.

pub mod cumulative;
pub mod distribution;
pub mod outlook;
pub mod ranking;
pub mod rollup;
pub mod rounding;
pub mod waterfall;

// Re-export the key operations to create a clean, public-facing API.
pub use cumulative::{cumulative_acv, cumulative_wins};
pub use distribution::{deal_distribution, distribution_of, pipeline_by_stage, NO_STAGE};
pub use outlook::{cumulative_outlook, OutlookInputs, OutlookMetric, OutlookPoint};
pub use ranking::ClientRollup;
pub use rollup::{acv_by_month, deals_by_month, forecast_over_time, DEFAULT_FORECAST_WINDOW};
pub use waterfall::{
    preceding_quarter_deals, quarter_deals, quarter_waterfall, ProjectionMetric, QuarterTarget,
    WaterfallInputs, WaterfallRow,
};
