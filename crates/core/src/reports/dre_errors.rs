use thiserror::Error;

/// Input errors for report queries.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("invalid period \"{0}\", expected the YYYY-MM format")]
    InvalidPeriod(String),
}
