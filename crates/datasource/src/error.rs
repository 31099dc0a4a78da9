use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The source returned status {0} for {1}")]
    Status(u16, String),

    #[error("Failed to parse sheet CSV: {0}")]
    Csv(#[from] csv::Error),
}
