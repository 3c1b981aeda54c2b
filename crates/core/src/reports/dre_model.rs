use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::DEFAULT_CURRENCY;
use crate::ledger::{AccountType, Basis, ManagedAccount};

/// Period granularity for report grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    Month,
    Quarter,
    Year,
}

impl Grouping {
    pub fn all() -> &'static [Grouping] {
        &[Grouping::Month, Grouping::Quarter, Grouping::Year]
    }
}

/// One DRE query. Empty filter vectors mean "no restriction".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreQuery {
    pub tenant_id: String,
    /// Inclusive month range, `YYYY-MM`.
    pub from: String,
    pub to: String,
    #[serde(default = "default_basis")]
    pub basis: Basis,
    #[serde(default = "default_grouping")]
    pub group_by: Grouping,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Credit-account code allow-list.
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub account_types: Vec<AccountType>,
    #[serde(default)]
    pub origins: Vec<String>,
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_basis() -> Basis {
    Basis::Accrual
}

fn default_grouping() -> Grouping {
    Grouping::Month
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// One report row: a `(period, credit account)` group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreRow {
    /// First day of the truncated period, `YYYY-MM-DD`.
    pub period: String,
    pub account_code: String,
    /// Resolved account name, defaulting to the raw code when unmapped.
    pub account_name: String,
    pub account_type: Option<AccountType>,
    pub total: Decimal,
    pub entries: usize,
}

/// Totals reduced from the rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreSummary {
    pub total: Decimal,
    pub by_type: BTreeMap<String, Decimal>,
    pub by_period: BTreeMap<String, Decimal>,
    pub by_account: BTreeMap<String, Decimal>,
}

/// Echo of the query parameters the report was computed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreMeta {
    pub tenant_id: String,
    pub from: String,
    pub to: String,
    pub basis: Basis,
    pub currency: String,
    pub group_by: Grouping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreReport {
    pub rows: Vec<DreRow>,
    pub summary: DreSummary,
    pub meta: DreMeta,
}

/// Everything a report UI needs to populate its filter controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreFilterOptions {
    pub accounts: Vec<ManagedAccount>,
    pub account_types: Vec<AccountType>,
    pub origins: Vec<String>,
    pub currencies: Vec<String>,
    pub bases: Vec<Basis>,
    pub groupings: Vec<Grouping>,
}
