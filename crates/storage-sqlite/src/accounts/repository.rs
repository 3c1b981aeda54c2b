use async_trait::async_trait;
use diesel::prelude::*;

use ledgerflow_core::ledger::{ManagedAccount, ManagedAccountRepositoryTrait};
use ledgerflow_core::Result;

use super::model::ManagedAccountRow;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::managed_accounts;

/// Diesel-backed chart-of-accounts repository.
pub struct ManagedAccountRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl ManagedAccountRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Seeds the default chart for a tenant, replacing same-coded entries.
    pub async fn seed_default_chart(&self, tenant_id: &str) -> Result<()> {
        for (code, name, account_type) in ledgerflow_core::ledger::default_chart() {
            self.upsert(ManagedAccount {
                id: format!("{}-{}", tenant_id, code),
                tenant_id: tenant_id.to_string(),
                code: code.to_string(),
                name: name.to_string(),
                account_type,
            })
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ManagedAccountRepositoryTrait for ManagedAccountRepository {
    fn list(&self, tenant_id: &str) -> Result<Vec<ManagedAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<ManagedAccountRow> = managed_accounts::table
            .filter(managed_accounts::tenant_id.eq(tenant_id))
            .order(managed_accounts::code.asc())
            .load(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| ManagedAccount::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn upsert(&self, account: ManagedAccount) -> Result<ManagedAccount> {
        let row = ManagedAccountRow::from(account.clone());
        self.writer
            .exec(move |conn| {
                diesel::replace_into(managed_accounts::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await?;
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init, spawn_writer};
    use ledgerflow_core::ledger::AccountType;
    use tempfile::tempdir;

    #[tokio::test]
    async fn upsert_replaces_by_tenant_and_code() {
        let dir = tempdir().unwrap();
        let pool = init(dir.path().join("ledger.db").to_str().unwrap()).unwrap();
        let repo = ManagedAccountRepository::new(pool.clone(), spawn_writer(pool));

        repo.seed_default_chart("t1").await.unwrap();
        let chart = repo.list("t1").unwrap();
        assert_eq!(chart.len(), 7);
        assert_eq!(chart[0].code, "3.1");
        assert_eq!(chart[0].account_type, AccountType::Revenue);

        // Renaming an account keeps the row count stable.
        repo.upsert(ManagedAccount {
            id: "t1-3.1".to_string(),
            tenant_id: "t1".to_string(),
            code: "3.1".to_string(),
            name: "Receita de Vendas".to_string(),
            account_type: AccountType::Revenue,
        })
        .await
        .unwrap();
        let chart = repo.list("t1").unwrap();
        assert_eq!(chart.len(), 7);
        assert_eq!(chart[0].name, "Receita de Vendas");

        assert!(repo.list("t2").unwrap().is_empty());
    }
}
