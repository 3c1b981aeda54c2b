//! LedgerFlow ERP Client Crate
//!
//! Transport-level client for a Tiny-style ERP API2: form-encoded POST
//! requests, JSON responses wrapped in a `retorno` envelope, collections
//! wrapped under resource-specific plural/singular key pairs, and the same
//! logical operation exposed under more than one endpoint spelling.
//!
//! # Overview
//!
//! The client supports:
//! - Four resources: orders, invoices, receivables, payables
//! - Endpoint spelling fallback per resource (first success wins)
//! - Summary search with date-range filters and page cursors
//! - Per-record detail enrichment that degrades to the summary on failure
//! - Page walking with bounded-concurrency detail fetches
//!
//! Everything upstream of transport (entity mapping, reconciliation,
//! scheduling) lives in `ledgerflow-core`, which consumes this crate only
//! through the [`ErpApi`] trait.

pub mod client;
pub mod errors;
pub mod payload;
pub mod resources;

pub use client::{collect_resource, ErpApi, ErpClient, DETAIL_CONCURRENCY};
pub use errors::ErpClientError;
pub use resources::{ErpResource, FinancialKind, SearchFilter};
