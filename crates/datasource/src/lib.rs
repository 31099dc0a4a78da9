//! # Sales data source adapters
//!
//! Three interchangeable sources produce the same normalized
//! [`SalesDataBundle`]: an in-process deterministic mock generator, a
//! published-spreadsheet CSV fetcher, and a client for the SQL-backed HTTP
//! API. Which one feeds a session is decided once at startup from
//! configuration; consumers only ever see the [`SalesDataSource`] trait.
//!
//! A session performs exactly one load. If it fails, that failure is the
//! session's single terminal error: no retry, no partial bundle. Everything
//! recoverable (a malformed cell, one unreachable sheet) degrades to a
//! default inside the adapter instead of surfacing.

use async_trait::async_trait;
use configuration::{Config, SourceKind};
use core_types::SalesDataBundle;

pub mod api;
pub mod error;
pub mod mock;
pub mod sheets;

// Re-export the key components to create a clean, public-facing API.
pub use api::ApiSource;
pub use error::SourceError;
pub use mock::MockSource;
pub use sheets::SheetsSource;

/// The capability every data source implements: produce the whole normalized
/// bundle in one load.
#[async_trait]
pub trait SalesDataSource: Send + Sync {
    /// Loads the full bundle.
    async fn load(&self) -> Result<SalesDataBundle, SourceError>;

    /// Short adapter name for logs and the health probe.
    fn name(&self) -> &'static str;
}

/// Picks the adapter named by the configuration. Selecting the strategy once
/// here keeps the consuming code free of per-source branching.
pub fn for_config(config: &Config) -> Box<dyn SalesDataSource> {
    match config.source {
        SourceKind::Mock => Box::new(MockSource::new(
            config.mock.seed,
            config.as_of.modeled_year,
        )),
        SourceKind::Sheets => Box::new(SheetsSource::new(config.sheets.clone())),
        SourceKind::Api => Box::new(ApiSource::new(config.api.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_selection_follows_the_config() {
        let mut config = Config::default();
        assert_eq!(for_config(&config).name(), "mock");
        config.source = SourceKind::Sheets;
        assert_eq!(for_config(&config).name(), "sheets");
        config.source = SourceKind::Api;
        assert_eq!(for_config(&config).name(), "api");
    }
}
