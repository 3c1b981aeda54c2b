use thiserror::Error;

/// Input errors for the spreadsheet import path.
///
/// Row-level problems are not errors; they surface as skip records on the
/// import outcome.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    #[error("failed to read workbook: {0}")]
    UnreadableWorkbook(String),

    #[error("failed to read sheet \"{0}\": {1}")]
    UnreadableSheet(String, String),
}
