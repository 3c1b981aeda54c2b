use async_trait::async_trait;
use std::collections::HashSet;

use super::ledger_model::*;
use crate::Result;

/// Contract for the transaction ledger store.
///
/// Writes go through the storage layer's single-writer path; the partial
/// unique index on `(tenant_id, origin, source_ref)` is the last line of
/// defense against two concurrent syncs inserting the same reference.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Inserts drafts as new rows, tolerating uniqueness conflicts.
    ///
    /// Returns the number of rows actually inserted; conflicting rows are
    /// silently skipped, never an error.
    async fn insert_transactions(&self, drafts: Vec<TransactionDraft>) -> Result<usize>;

    /// Applies a field-level update to the row identified by
    /// `(tenant_id, origin, source_ref)`. Returns the number of rows touched.
    async fn update_by_origin_ref(
        &self,
        tenant_id: &str,
        origin: &str,
        source_ref: &str,
        patch: TransactionPatch,
    ) -> Result<usize>;

    /// Which of the given references already exist for the tenant under any
    /// of the given origins.
    fn find_existing_refs(
        &self,
        tenant_id: &str,
        origins: &[String],
        refs: &[String],
    ) -> Result<HashSet<String>>;

    /// Filtered, account-enriched entries for the aggregation engine.
    fn query_report_entries(&self, query: &ReportQuery) -> Result<Vec<ReportEntry>>;

    fn list_distinct_origins(&self, tenant_id: &str) -> Result<Vec<String>>;

    fn list_distinct_currencies(&self, tenant_id: &str) -> Result<Vec<String>>;

    /// Row count for one reference; diagnostics and tests.
    fn count_for_ref(&self, tenant_id: &str, origin: &str, source_ref: &str) -> Result<i64>;
}

/// Contract for chart-of-accounts lookups.
#[async_trait]
pub trait ManagedAccountRepositoryTrait: Send + Sync {
    /// All accounts for a tenant, ordered by code.
    fn list(&self, tenant_id: &str) -> Result<Vec<ManagedAccount>>;

    /// Creates or replaces the account with the same `(tenant_id, code)`.
    async fn upsert(&self, account: ManagedAccount) -> Result<ManagedAccount>;
}
