use diesel::prelude::*;

use ledgerflow_core::ledger::ManagedAccount;

use crate::errors::StorageError;
use crate::schema::managed_accounts;

/// Database row for a chart-of-accounts entry.
#[derive(Queryable, Selectable, Identifiable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = managed_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ManagedAccountRow {
    pub id: String,
    pub tenant_id: String,
    pub code: String,
    pub name: String,
    pub account_type: String,
}

impl From<ManagedAccount> for ManagedAccountRow {
    fn from(account: ManagedAccount) -> Self {
        Self {
            id: account.id,
            tenant_id: account.tenant_id,
            code: account.code,
            name: account.name,
            account_type: account.account_type.as_str().to_string(),
        }
    }
}

impl TryFrom<ManagedAccountRow> for ManagedAccount {
    type Error = StorageError;

    fn try_from(row: ManagedAccountRow) -> Result<Self, Self::Error> {
        let account_type = row
            .account_type
            .parse()
            .map_err(|_| StorageError::Corrupt(format!("account type \"{}\"", row.account_type)))?;
        Ok(ManagedAccount {
            id: row.id,
            tenant_id: row.tenant_id,
            code: row.code,
            name: row.name,
            account_type,
        })
    }
}
