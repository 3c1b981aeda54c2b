//! LedgerFlow Core - Domain entities, services, and traits.
//!
//! This crate contains the ingestion-normalization-reconciliation-aggregation
//! pipeline for the multi-tenant transaction ledger. It is database-agnostic
//! and defines traits that are implemented by the `storage-sqlite` crate;
//! ERP transport lives in the `erp-client` crate behind the `ErpApi` trait.

pub mod constants;
pub mod erp;
pub mod errors;
pub mod import;
pub mod ledger;
pub mod parsing;
pub mod reconciliation;
pub mod reports;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
