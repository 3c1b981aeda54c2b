use thiserror::Error;

/// Transport-level errors from the ERP API.
///
/// Endpoint fallback happens inside the client; an error here means every
/// spelling of the operation failed. Detail-lookup failures never surface as
/// errors at all (the summary is returned unenriched).
#[derive(Error, Debug)]
pub enum ErpClientError {
    #[error("ERP request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("ERP endpoint {endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("ERP response from {endpoint} was not valid JSON: {message}")]
    InvalidJson { endpoint: String, message: String },
}
