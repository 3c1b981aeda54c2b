use thiserror::Error;

use ledgerflow_erp::ErpClientError;

/// Errors raised by the ERP integration services.
#[derive(Error, Debug)]
pub enum ErpError {
    /// No API token configured or supplied for the tenant.
    #[error("ERP token not configured for tenant {0}")]
    MissingToken(String),

    #[error("Unsupported ERP module \"{0}\"")]
    UnsupportedModule(String),

    #[error("ERP client error: {0}")]
    Client(#[from] ErpClientError),
}
