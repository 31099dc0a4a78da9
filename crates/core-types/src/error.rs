use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid quarter id '{0}': expected the form 2026Q1")]
    InvalidQuarter(String),
}
