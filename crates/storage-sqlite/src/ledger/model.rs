use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use ledgerflow_core::ledger::{Transaction, TransactionDraft};

use crate::errors::StorageError;
use crate::schema::transactions;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database row for a ledger transaction. Dates are ISO `YYYY-MM-DD` text
/// (lexicographic order matches calendar order) and amounts are decimal
/// text so they round-trip exactly.
#[derive(Queryable, Selectable, Identifiable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionRow {
    pub id: String,
    pub tenant_id: String,
    pub date: String,
    pub accrual_date: Option<String>,
    pub debit_account: String,
    pub credit_account: String,
    pub amount: String,
    pub currency: String,
    pub memo: Option<String>,
    pub origin: String,
    pub source_ref: Option<String>,
    pub meta: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TransactionRow {
    /// Materializes a draft as an insertable row with a fresh id.
    pub fn from_draft(draft: TransactionDraft) -> Self {
        let now = format_timestamp(Utc::now());
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: draft.tenant_id,
            date: format_date(draft.date),
            accrual_date: draft.accrual_date.map(format_date),
            debit_account: draft.debit_account,
            credit_account: draft.credit_account,
            amount: draft.amount.to_string(),
            currency: draft.currency,
            memo: draft.memo,
            origin: draft.origin,
            source_ref: draft.source_ref,
            meta: draft.meta.map(|m| m.to_string()),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StorageError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            date: parse_date(&row.date)?,
            accrual_date: row.accrual_date.as_deref().map(parse_date).transpose()?,
            amount: parse_amount(&row.amount)?,
            meta: row
                .meta
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(|e| StorageError::Corrupt(format!("meta for row {}: {}", row.id, e)))?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            id: row.id,
            tenant_id: row.tenant_id,
            debit_account: row.debit_account,
            credit_account: row.credit_account,
            currency: row.currency,
            memo: row.memo,
            origin: row.origin,
            source_ref: row.source_ref,
        })
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(text: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| StorageError::Corrupt(format!("date \"{}\": {}", text, e)))
}

pub(crate) fn parse_amount(text: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(text).map_err(|e| StorageError::Corrupt(format!("amount \"{}\": {}", text, e)))
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("timestamp \"{}\": {}", text, e)))
}
