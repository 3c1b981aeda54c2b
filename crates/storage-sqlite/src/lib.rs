//! SQLite storage implementation for LedgerFlow.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `ledgerflow-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the ledger, chart of accounts and
//!   integration configs
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. Everything else is database-agnostic and works with traits. All
//! writes are funneled through a single writer actor holding one connection,
//! which serializes concurrent syncs; the partial unique index on
//! `(tenant_id, origin, source_ref)` backs that up at the schema level.

pub mod accounts;
pub mod db;
pub mod errors;
pub mod integrations;
pub mod ledger;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::StorageError;

// Re-export repositories
pub use accounts::ManagedAccountRepository;
pub use integrations::IntegrationConfigRepository;
pub use ledger::LedgerRepository;

// Re-export from ledgerflow-core for convenience
pub use ledgerflow_core::errors::{DatabaseError, Error, Result};
