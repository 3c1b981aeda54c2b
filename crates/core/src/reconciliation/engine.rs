use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::ledger::{LedgerRepositoryTrait, TransactionDraft};
use crate::Result;

/// What happened to one reconciled batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    /// Rows newly inserted.
    pub inserted: usize,
    /// Rows updated in place because their reference already existed.
    pub updated: usize,
    /// Inserts the store dropped on a uniqueness conflict. Accepted by
    /// design; reported as a count, never an error.
    pub duplicates: usize,
}

impl ReconcileOutcome {
    /// Drafts that ended up represented in the ledger after this batch.
    pub fn persisted(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Deduplicates a batch of drafts against the existing ledger.
///
/// This engine is the only component that writes ledger rows: drafts with a
/// `source_ref` matching an existing `(tenant, origin, ref)` become in-place
/// updates, everything else is inserted. Drafts without a reference have no
/// identity to reconcile against and are always inserted.
pub struct ReconciliationEngine {
    ledger: Arc<dyn LedgerRepositoryTrait>,
}

impl ReconciliationEngine {
    pub fn new(ledger: Arc<dyn LedgerRepositoryTrait>) -> Self {
        Self { ledger }
    }

    /// Applies one tenant's batch of drafts to the ledger.
    pub async fn reconcile(
        &self,
        tenant_id: &str,
        drafts: Vec<TransactionDraft>,
    ) -> Result<ReconcileOutcome> {
        if drafts.is_empty() {
            return Ok(ReconcileOutcome::default());
        }

        let mut refs: Vec<String> = Vec::new();
        let mut origins: Vec<String> = Vec::new();
        for draft in &drafts {
            if let Some(r) = &draft.source_ref {
                if !refs.contains(r) {
                    refs.push(r.clone());
                }
                if !origins.contains(&draft.origin) {
                    origins.push(draft.origin.clone());
                }
            }
        }

        let existing: HashSet<String> = if refs.is_empty() {
            HashSet::new()
        } else {
            self.ledger.find_existing_refs(tenant_id, &origins, &refs)?
        };

        let (updates, fresh): (Vec<_>, Vec<_>) = drafts.into_iter().partition(|d| {
            d.source_ref
                .as_ref()
                .map(|r| existing.contains(r))
                .unwrap_or(false)
        });

        let mut updated = 0usize;
        for draft in updates {
            let source_ref = draft
                .source_ref
                .as_deref()
                .unwrap_or_default()
                .to_string();
            let touched = self
                .ledger
                .update_by_origin_ref(tenant_id, &draft.origin, &source_ref, draft.as_patch())
                .await?;
            updated += touched;
        }

        let fresh_count = fresh.len();
        let inserted = if fresh.is_empty() {
            0
        } else {
            self.ledger.insert_transactions(fresh).await?
        };
        let duplicates = fresh_count.saturating_sub(inserted);

        debug!(
            "reconciled batch for tenant {}: {} inserted, {} updated, {} duplicates",
            tenant_id, inserted, updated, duplicates
        );

        Ok(ReconcileOutcome {
            inserted,
            updated,
            duplicates,
        })
    }
}
