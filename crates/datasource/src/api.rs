use async_trait::async_trait;
use configuration::ApiConfig;
use core_types::SalesDataBundle;

use crate::error::SourceError;
use crate::SalesDataSource;

/// Client for the SQL-backed sales API: one `GET /api/sales-data` returns the
/// whole bundle, already in the normalized shape.
pub struct ApiSource {
    config: ApiConfig,
    client: reqwest::Client,
}

impl ApiSource {
    pub fn new(config: ApiConfig) -> Self {
        ApiSource {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn bundle_url(&self) -> String {
        format!(
            "{}/api/sales-data",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl SalesDataSource for ApiSource {
    async fn load(&self) -> Result<SalesDataBundle, SourceError> {
        if self.config.base_url.is_empty() {
            return Err(SourceError::NotConfigured(
                "api.base_url is empty".to_string(),
            ));
        }
        let url = self.bundle_url();
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16(), url));
        }
        let bundle = response.json::<SalesDataBundle>().await?;
        Ok(bundle)
    }

    fn name(&self) -> &'static str {
        "api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_url_tolerates_trailing_slashes() {
        let source = ApiSource::new(ApiConfig {
            base_url: "http://localhost:3001/".to_string(),
        });
        assert_eq!(source.bundle_url(), "http://localhost:3001/api/sales-data");
    }

    #[tokio::test]
    async fn unconfigured_base_url_is_a_terminal_error() {
        let source = ApiSource::new(ApiConfig::default());
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured(_)));
    }
}
