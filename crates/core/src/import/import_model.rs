use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CURRENCY, DEFAULT_RECEIVABLE_ACCOUNT, DEFAULT_REVENUE_ACCOUNT, SPREADSHEET_ORIGIN,
};

/// Fallback values substituted when a row cannot resolve a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDefaults {
    pub debit_account: String,
    pub credit_account: String,
    pub currency: String,
    pub origin: String,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            debit_account: DEFAULT_RECEIVABLE_ACCOUNT.to_string(),
            credit_account: DEFAULT_REVENUE_ACCOUNT.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            origin: SPREADSHEET_ORIGIN.to_string(),
        }
    }
}

/// A row that was skipped, with its operator-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

/// Result of one spreadsheet import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Rows persisted to the ledger (inserts plus reconciled updates).
    pub imported: usize,
    pub skipped: usize,
    pub sheet: String,
    pub skipped_rows: Vec<SkippedRow>,
    pub warning: Option<String>,
}
