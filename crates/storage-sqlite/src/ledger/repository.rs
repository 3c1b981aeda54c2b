use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::{HashMap, HashSet};

use ledgerflow_core::ledger::{
    AccountType, Basis, LedgerRepositoryTrait, ReportEntry, ReportQuery, Transaction,
    TransactionDraft, TransactionPatch,
};
use ledgerflow_core::Result;

use super::model::{format_date, format_timestamp, TransactionRow};
use crate::accounts::ManagedAccountRow;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{managed_accounts, transactions};

/// Refs per `eq_any` chunk, comfortably under SQLite's parameter limit.
const REF_CHUNK_SIZE: usize = 400;

/// Diesel-backed implementation of the ledger store contract.
pub struct LedgerRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn insert_transactions(&self, drafts: Vec<TransactionDraft>) -> Result<usize> {
        if drafts.is_empty() {
            return Ok(0);
        }
        let rows: Vec<TransactionRow> = drafts.into_iter().map(TransactionRow::from_draft).collect();

        self.writer
            .exec(move |conn| {
                // INSERT OR IGNORE: a reference that already exists (or
                // appears twice in one batch) is dropped silently; the
                // affected-row count is what actually landed.
                diesel::insert_or_ignore_into(transactions::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await
    }

    async fn update_by_origin_ref(
        &self,
        tenant_id: &str,
        origin: &str,
        source_ref: &str,
        patch: TransactionPatch,
    ) -> Result<usize> {
        let tenant_id = tenant_id.to_string();
        let origin = origin.to_string();
        let source_ref = source_ref.to_string();

        self.writer
            .exec(move |conn| {
                diesel::update(
                    transactions::table
                        .filter(transactions::tenant_id.eq(&tenant_id))
                        .filter(transactions::origin.eq(&origin))
                        .filter(transactions::source_ref.eq(&source_ref)),
                )
                .set((
                    transactions::date.eq(format_date(patch.date)),
                    transactions::accrual_date.eq(patch.accrual_date.map(format_date)),
                    transactions::debit_account.eq(&patch.debit_account),
                    transactions::credit_account.eq(&patch.credit_account),
                    transactions::amount.eq(patch.amount.to_string()),
                    transactions::currency.eq(&patch.currency),
                    transactions::memo.eq(&patch.memo),
                    transactions::meta.eq(patch.meta.as_ref().map(|m| m.to_string())),
                    transactions::updated_at.eq(format_timestamp(chrono::Utc::now())),
                ))
                .execute(conn)
                .map_err(|e| StorageError::from(e).into())
            })
            .await
    }

    fn find_existing_refs(
        &self,
        tenant_id: &str,
        origins: &[String],
        refs: &[String],
    ) -> Result<HashSet<String>> {
        let mut conn = get_connection(&self.pool)?;
        let mut found = HashSet::new();

        for chunk in refs.chunks(REF_CHUNK_SIZE) {
            let candidates: Vec<Option<String>> = chunk.iter().cloned().map(Some).collect();
            let rows: Vec<Option<String>> = transactions::table
                .filter(transactions::tenant_id.eq(tenant_id))
                .filter(transactions::origin.eq_any(origins))
                .filter(transactions::source_ref.eq_any(candidates))
                .select(transactions::source_ref)
                .load(&mut conn)
                .map_err(StorageError::from)?;
            found.extend(rows.into_iter().flatten());
        }
        Ok(found)
    }

    fn query_report_entries(&self, query: &ReportQuery) -> Result<Vec<ReportEntry>> {
        let mut conn = get_connection(&self.pool)?;

        let mut sql = transactions::table
            .select(TransactionRow::as_select())
            .filter(transactions::tenant_id.eq(&query.tenant_id))
            .into_boxed();
        if !query.accounts.is_empty() {
            sql = sql.filter(transactions::credit_account.eq_any(&query.accounts));
        }
        if !query.origins.is_empty() {
            sql = sql.filter(transactions::origin.eq_any(&query.origins));
        }

        let rows: Vec<TransactionRow> = sql.load(&mut conn).map_err(StorageError::from)?;

        let chart: HashMap<String, (String, AccountType)> = managed_accounts::table
            .filter(managed_accounts::tenant_id.eq(&query.tenant_id))
            .load::<ManagedAccountRow>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .filter_map(|row| {
                let account_type = row.account_type.parse().ok()?;
                Some((row.code, (row.name, account_type)))
            })
            .collect();

        let search = query
            .search
            .as_ref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        // Basis-date range, amount bounds, type and search filters need the
        // decoded values, so they apply after the load.
        let mut entries = Vec::new();
        for row in rows {
            let tx = Transaction::try_from(row).map_err(ledgerflow_core::Error::from)?;
            let basis_date = match query.basis {
                Basis::Cash => tx.date,
                Basis::Accrual => tx.accrual_date.unwrap_or(tx.date),
            };
            if basis_date < query.from_date || basis_date > query.to_date {
                continue;
            }
            if query.min_amount.is_some_and(|min| tx.amount < min) {
                continue;
            }
            if query.max_amount.is_some_and(|max| tx.amount > max) {
                continue;
            }

            let account = chart.get(&tx.credit_account);
            if !query.account_types.is_empty() {
                match account {
                    Some((_, account_type)) if query.account_types.contains(account_type) => {}
                    _ => continue,
                }
            }

            if let Some(term) = &search {
                let name = account.map(|(name, _)| name.to_lowercase()).unwrap_or_default();
                let matches = name.contains(term)
                    || tx.credit_account.to_lowercase().contains(term)
                    || tx.debit_account.to_lowercase().contains(term)
                    || tx.memo.as_deref().unwrap_or_default().to_lowercase().contains(term)
                    || tx
                        .source_ref
                        .as_deref()
                        .unwrap_or_default()
                        .to_lowercase()
                        .contains(term);
                if !matches {
                    continue;
                }
            }

            entries.push(ReportEntry {
                basis_date,
                credit_account: tx.credit_account.clone(),
                account_name: account.map(|(name, _)| name.clone()),
                account_type: account.map(|(_, account_type)| *account_type),
                amount: tx.amount,
            });
        }
        Ok(entries)
    }

    fn list_distinct_origins(&self, tenant_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(transactions::tenant_id.eq(tenant_id))
            .select(transactions::origin)
            .distinct()
            .order(transactions::origin.asc())
            .load(&mut conn)
            .map_err(|e| StorageError::from(e).into())
    }

    fn list_distinct_currencies(&self, tenant_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(transactions::tenant_id.eq(tenant_id))
            .select(transactions::currency)
            .distinct()
            .order(transactions::currency.asc())
            .load(&mut conn)
            .map_err(|e| StorageError::from(e).into())
    }

    fn count_for_ref(&self, tenant_id: &str, origin: &str, source_ref: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(transactions::tenant_id.eq(tenant_id))
            .filter(transactions::origin.eq(origin))
            .filter(transactions::source_ref.eq(source_ref))
            .count()
            .get_result(&mut conn)
            .map_err(|e| StorageError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init, spawn_writer};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn draft(source_ref: Option<&str>, amount: rust_decimal::Decimal) -> TransactionDraft {
        TransactionDraft {
            tenant_id: "t1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            accrual_date: None,
            debit_account: "Clientes".to_string(),
            credit_account: "3.1".to_string(),
            amount,
            currency: "BRL".to_string(),
            memo: Some("memo".to_string()),
            origin: "ERP:Tiny:orders".to_string(),
            source_ref: source_ref.map(String::from),
            meta: Some(serde_json::json!({"id": 1})),
        }
    }

    fn report_query() -> ReportQuery {
        ReportQuery {
            tenant_id: "t1".to_string(),
            basis: Basis::Cash,
            from_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            to_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            accounts: vec![],
            account_types: vec![],
            origins: vec![],
            min_amount: None,
            max_amount: None,
            search: None,
        }
    }

    #[tokio::test]
    async fn conflicting_reference_inserts_are_ignored_not_errors() {
        let dir = tempdir().unwrap();
        let pool = init(dir.path().join("ledger.db").to_str().unwrap()).unwrap();
        let repo = LedgerRepository::new(pool.clone(), spawn_writer(pool));

        let inserted = repo
            .insert_transactions(vec![
                draft(Some("tiny:order:1"), dec!(10)),
                draft(Some("tiny:order:1"), dec!(10)),
                draft(None, dec!(5)),
            ])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(
            repo.count_for_ref("t1", "ERP:Tiny:orders", "tiny:order:1")
                .unwrap(),
            1
        );

        // A second pass over the same reference is ignored again.
        let again = repo
            .insert_transactions(vec![draft(Some("tiny:order:1"), dec!(10))])
            .await
            .unwrap();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn update_by_ref_applies_field_level_changes() {
        let dir = tempdir().unwrap();
        let pool = init(dir.path().join("ledger.db").to_str().unwrap()).unwrap();
        let repo = LedgerRepository::new(pool.clone(), spawn_writer(pool));

        repo.insert_transactions(vec![draft(Some("tiny:order:2"), dec!(10))])
            .await
            .unwrap();

        let mut patch = draft(Some("tiny:order:2"), dec!(99.90)).as_patch();
        patch.memo = Some("updated".to_string());
        let touched = repo
            .update_by_origin_ref("t1", "ERP:Tiny:orders", "tiny:order:2", patch)
            .await
            .unwrap();
        assert_eq!(touched, 1);

        let entries = repo.query_report_entries(&report_query()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, dec!(99.90));
    }

    #[tokio::test]
    async fn decimal_amounts_round_trip_exactly() {
        let dir = tempdir().unwrap();
        let pool = init(dir.path().join("ledger.db").to_str().unwrap()).unwrap();
        let repo = LedgerRepository::new(pool.clone(), spawn_writer(pool));

        // A value that would drift through f64 storage.
        repo.insert_transactions(vec![draft(None, dec!(0.1)), draft(None, dec!(0.2))])
            .await
            .unwrap();

        let entries = repo.query_report_entries(&report_query()).unwrap();
        let total: rust_decimal::Decimal = entries.iter().map(|e| e.amount).sum();
        assert_eq!(total, dec!(0.3));
    }

    #[tokio::test]
    async fn existing_refs_are_found_per_tenant_and_origin() {
        let dir = tempdir().unwrap();
        let pool = init(dir.path().join("ledger.db").to_str().unwrap()).unwrap();
        let repo = LedgerRepository::new(pool.clone(), spawn_writer(pool));

        repo.insert_transactions(vec![draft(Some("tiny:order:3"), dec!(10))])
            .await
            .unwrap();

        let refs = vec!["tiny:order:3".to_string(), "tiny:order:4".to_string()];
        let origins = vec!["ERP:Tiny:orders".to_string()];
        let found = repo.find_existing_refs("t1", &origins, &refs).unwrap();
        assert!(found.contains("tiny:order:3"));
        assert!(!found.contains("tiny:order:4"));

        let other_tenant = repo.find_existing_refs("t2", &origins, &refs).unwrap();
        assert!(other_tenant.is_empty());
    }

    #[tokio::test]
    async fn distinct_listings_cover_origin_and_currency() {
        let dir = tempdir().unwrap();
        let pool = init(dir.path().join("ledger.db").to_str().unwrap()).unwrap();
        let repo = LedgerRepository::new(pool.clone(), spawn_writer(pool));

        let mut other = draft(None, dec!(1));
        other.origin = "import:xlsx".to_string();
        repo.insert_transactions(vec![draft(None, dec!(1)), other])
            .await
            .unwrap();

        assert_eq!(
            repo.list_distinct_origins("t1").unwrap(),
            vec!["ERP:Tiny:orders".to_string(), "import:xlsx".to_string()]
        );
        assert_eq!(repo.list_distinct_currencies("t1").unwrap(), vec!["BRL"]);
    }
}
