//! In-memory repository fakes shared by the service test modules.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::ledger::{
    Basis, LedgerRepositoryTrait, ManagedAccount, ManagedAccountRepositoryTrait, ReportEntry,
    ReportQuery, Transaction, TransactionDraft, TransactionPatch,
};
use crate::Result;

/// Ledger fake backed by a `Vec`, mirroring the store contract including the
/// conflict-tolerant insert on `(tenant, origin, source_ref)`.
#[derive(Default)]
pub struct MemoryLedger {
    pub rows: Mutex<Vec<Transaction>>,
    pub accounts: Mutex<Vec<ManagedAccount>>,
}

impl MemoryLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn add_account(&self, account: ManagedAccount) {
        self.accounts.lock().unwrap().push(account);
    }
}

#[async_trait]
impl LedgerRepositoryTrait for MemoryLedger {
    async fn insert_transactions(&self, drafts: Vec<TransactionDraft>) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let mut inserted = 0;
        for draft in drafts {
            let conflict = draft.source_ref.as_ref().is_some_and(|r| {
                rows.iter().any(|t| {
                    t.tenant_id == draft.tenant_id
                        && t.origin == draft.origin
                        && t.source_ref.as_deref() == Some(r.as_str())
                })
            });
            if conflict {
                continue;
            }
            let now = Utc::now();
            rows.push(Transaction {
                id: Uuid::new_v4().to_string(),
                tenant_id: draft.tenant_id,
                date: draft.date,
                accrual_date: draft.accrual_date,
                debit_account: draft.debit_account,
                credit_account: draft.credit_account,
                amount: draft.amount,
                currency: draft.currency,
                memo: draft.memo,
                origin: draft.origin,
                source_ref: draft.source_ref,
                meta: draft.meta,
                created_at: now,
                updated_at: now,
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn update_by_origin_ref(
        &self,
        tenant_id: &str,
        origin: &str,
        source_ref: &str,
        patch: TransactionPatch,
    ) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let mut touched = 0;
        for row in rows.iter_mut() {
            if row.tenant_id == tenant_id
                && row.origin == origin
                && row.source_ref.as_deref() == Some(source_ref)
            {
                row.date = patch.date;
                row.accrual_date = patch.accrual_date;
                row.debit_account = patch.debit_account.clone();
                row.credit_account = patch.credit_account.clone();
                row.amount = patch.amount;
                row.currency = patch.currency.clone();
                row.memo = patch.memo.clone();
                row.meta = patch.meta.clone();
                row.updated_at = Utc::now();
                touched += 1;
            }
        }
        Ok(touched)
    }

    fn find_existing_refs(
        &self,
        tenant_id: &str,
        origins: &[String],
        refs: &[String],
    ) -> Result<HashSet<String>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|t| t.tenant_id == tenant_id && origins.contains(&t.origin))
            .filter_map(|t| t.source_ref.clone())
            .filter(|r| refs.contains(r))
            .collect())
    }

    fn query_report_entries(&self, query: &ReportQuery) -> Result<Vec<ReportEntry>> {
        let rows = self.rows.lock().unwrap();
        let accounts = self.accounts.lock().unwrap();
        let search = query.search.as_ref().map(|s| s.trim().to_lowercase());

        let mut entries = Vec::new();
        for row in rows.iter().filter(|t| t.tenant_id == query.tenant_id) {
            let basis_date = match query.basis {
                Basis::Cash => row.date,
                Basis::Accrual => row.accrual_date.unwrap_or(row.date),
            };
            if basis_date < query.from_date || basis_date > query.to_date {
                continue;
            }
            if !query.accounts.is_empty() && !query.accounts.contains(&row.credit_account) {
                continue;
            }
            if !query.origins.is_empty() && !query.origins.contains(&row.origin) {
                continue;
            }
            if query.min_amount.is_some_and(|min| row.amount < min) {
                continue;
            }
            if query.max_amount.is_some_and(|max| row.amount > max) {
                continue;
            }

            let account = accounts
                .iter()
                .find(|a| a.tenant_id == row.tenant_id && a.code == row.credit_account);

            if !query.account_types.is_empty() {
                match account {
                    Some(a) if query.account_types.contains(&a.account_type) => {}
                    _ => continue,
                }
            }

            if let Some(term) = &search {
                if !term.is_empty() {
                    let name = account.map(|a| a.name.to_lowercase()).unwrap_or_default();
                    let haystacks = [
                        name,
                        row.credit_account.to_lowercase(),
                        row.debit_account.to_lowercase(),
                        row.memo.clone().unwrap_or_default().to_lowercase(),
                        row.source_ref.clone().unwrap_or_default().to_lowercase(),
                    ];
                    if !haystacks.iter().any(|h| h.contains(term.as_str())) {
                        continue;
                    }
                }
            }

            entries.push(ReportEntry {
                basis_date,
                credit_account: row.credit_account.clone(),
                account_name: account.map(|a| a.name.clone()),
                account_type: account.map(|a| a.account_type),
                amount: row.amount,
            });
        }
        Ok(entries)
    }

    fn list_distinct_origins(&self, tenant_id: &str) -> Result<Vec<String>> {
        let rows = self.rows.lock().unwrap();
        let mut origins: Vec<String> = rows
            .iter()
            .filter(|t| t.tenant_id == tenant_id)
            .map(|t| t.origin.clone())
            .collect();
        origins.sort();
        origins.dedup();
        Ok(origins)
    }

    fn list_distinct_currencies(&self, tenant_id: &str) -> Result<Vec<String>> {
        let rows = self.rows.lock().unwrap();
        let mut currencies: Vec<String> = rows
            .iter()
            .filter(|t| t.tenant_id == tenant_id)
            .map(|t| t.currency.clone())
            .collect();
        currencies.sort();
        currencies.dedup();
        Ok(currencies)
    }

    fn count_for_ref(&self, tenant_id: &str, origin: &str, source_ref: &str) -> Result<i64> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|t| {
                t.tenant_id == tenant_id
                    && t.origin == origin
                    && t.source_ref.as_deref() == Some(source_ref)
            })
            .count() as i64)
    }
}

#[async_trait]
impl ManagedAccountRepositoryTrait for MemoryLedger {
    fn list(&self, tenant_id: &str) -> Result<Vec<ManagedAccount>> {
        let accounts = self.accounts.lock().unwrap();
        let mut out: Vec<ManagedAccount> = accounts
            .iter()
            .filter(|a| a.tenant_id == tenant_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(out)
    }

    async fn upsert(&self, account: ManagedAccount) -> Result<ManagedAccount> {
        let mut accounts = self.accounts.lock().unwrap();
        accounts.retain(|a| !(a.tenant_id == account.tenant_id && a.code == account.code));
        accounts.push(account.clone());
        Ok(account)
    }
}
