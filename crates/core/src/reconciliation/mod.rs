//! Reconciliation module - upserts transaction drafts into the ledger by
//! `(tenant, origin, source_ref)` so repeated syncs never double count.

mod engine;


pub use engine::{ReconcileOutcome, ReconciliationEngine};
