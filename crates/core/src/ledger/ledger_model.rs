use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::LedgerError;

/// Classification of a chart-of-accounts entry, used by report summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Revenue,
    Deduction,
    Cost,
    Opex,
    Result,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Revenue => "REVENUE",
            AccountType::Deduction => "DEDUCTION",
            AccountType::Cost => "COST",
            AccountType::Opex => "OPEX",
            AccountType::Result => "RESULT",
            AccountType::Other => "OTHER",
        }
    }

    /// All known types, in report display order.
    pub fn all() -> &'static [AccountType] {
        &[
            AccountType::Revenue,
            AccountType::Deduction,
            AccountType::Cost,
            AccountType::Opex,
            AccountType::Result,
            AccountType::Other,
        ]
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REVENUE" => Ok(AccountType::Revenue),
            "DEDUCTION" => Ok(AccountType::Deduction),
            "COST" => Ok(AccountType::Cost),
            "OPEX" => Ok(AccountType::Opex),
            "RESULT" => Ok(AccountType::Result),
            "OTHER" => Ok(AccountType::Other),
            other => Err(LedgerError::InvalidAccountType(other.to_string())),
        }
    }
}

/// Which date field drives period grouping in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Basis {
    /// Group by the cash-basis `date`.
    Cash,
    /// Group by `accrual_date`, falling back to `date` when null.
    Accrual,
}

/// Chart-of-accounts entry. Read-side enrichment only; ingestion never
/// mutates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedAccount {
    pub id: String,
    pub tenant_id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
}

/// The default chart seeded for new tenants, mirroring a small Brazilian
/// DRE layout.
pub fn default_chart() -> Vec<(&'static str, &'static str, AccountType)> {
    vec![
        ("3.1", "Receita Bruta", AccountType::Revenue),
        ("3.2", "Dedução", AccountType::Deduction),
        ("3.3", "Receita Líquida", AccountType::Revenue),
        ("4.1", "CMV/CPV", AccountType::Cost),
        ("4.2", "Margem Bruta", AccountType::Revenue),
        ("5.1", "Despesas Operacionais", AccountType::Opex),
        ("9.1", "Resultado do Exercício", AccountType::Result),
    ]
}

/// A persisted ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub tenant_id: String,
    /// Cash-basis date.
    pub date: NaiveDate,
    /// Accrual-basis date, when the source distinguishes one.
    pub accrual_date: Option<NaiveDate>,
    pub debit_account: String,
    pub credit_account: String,
    /// Signed amount; payables are negative.
    pub amount: Decimal,
    pub currency: String,
    pub memo: Option<String>,
    /// Tag identifying the ingestion path (`import:xlsx`, `ERP:Tiny:orders`, …).
    pub origin: String,
    /// Stable external identifier used for reconciliation; `None` means the
    /// row has no identity and is always inserted as a new event.
    pub source_ref: Option<String>,
    /// Original payload kept verbatim for audit/debug.
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A normalized transaction produced by an ingestion path, not yet
/// reconciled against the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub tenant_id: String,
    pub date: NaiveDate,
    pub accrual_date: Option<NaiveDate>,
    pub debit_account: String,
    pub credit_account: String,
    pub amount: Decimal,
    pub currency: String,
    pub memo: Option<String>,
    pub origin: String,
    pub source_ref: Option<String>,
    pub meta: Option<Value>,
}

impl TransactionDraft {
    /// The field-level update applied when this draft matches an existing
    /// row. Identity fields (tenant, origin, ref) are deliberately absent.
    pub fn as_patch(&self) -> TransactionPatch {
        TransactionPatch {
            date: self.date,
            accrual_date: self.accrual_date,
            debit_account: self.debit_account.clone(),
            credit_account: self.credit_account.clone(),
            amount: self.amount,
            currency: self.currency.clone(),
            memo: self.memo.clone(),
            meta: self.meta.clone(),
        }
    }
}

/// Field-level update for an existing ledger row, keyed externally by
/// `(tenant_id, origin, source_ref)`.
#[derive(Debug, Clone)]
pub struct TransactionPatch {
    pub date: NaiveDate,
    pub accrual_date: Option<NaiveDate>,
    pub debit_account: String,
    pub credit_account: String,
    pub amount: Decimal,
    pub currency: String,
    pub memo: Option<String>,
    pub meta: Option<Value>,
}

/// Filtered read used by the aggregation engine. Grouping and summing are
/// done by the engine itself with `Decimal`, so amounts never pass through
/// floating point.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub tenant_id: String,
    pub basis: Basis,
    /// Inclusive basis-date range.
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// Credit-account allow-list; empty means no restriction.
    pub accounts: Vec<String>,
    pub account_types: Vec<AccountType>,
    pub origins: Vec<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    /// Case-insensitive substring over account name, debit/credit code,
    /// memo and source reference.
    pub search: Option<String>,
}

/// One ledger entry as seen by the aggregation engine: basis date already
/// resolved, account enrichment already joined.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub basis_date: NaiveDate,
    pub credit_account: String,
    pub account_name: Option<String>,
    pub account_type: Option<AccountType>,
    pub amount: Decimal,
}
