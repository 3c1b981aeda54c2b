use chrono::{Datelike, Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::dre_model::*;
use super::ReportError;
use crate::ledger::{
    LedgerRepositoryTrait, ManagedAccountRepositoryTrait, AccountType, Basis, ReportQuery,
};
use crate::Result;

lazy_static! {
    static ref PERIOD_RE: Regex = Regex::new(r"^\d{4}-\d{2}$").expect("static regex");
}

/// Key used for rows whose account has no mapped type.
const UNKNOWN_TYPE: &str = "UNKNOWN";

/// Builds filtered, grouped, summarized DRE reports from the ledger.
///
/// Grouping and summing happen here with `Decimal`, so amounts never take a
/// detour through floating point.
pub struct DreService {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    accounts: Arc<dyn ManagedAccountRepositoryTrait>,
}

impl DreService {
    pub fn new(
        ledger: Arc<dyn LedgerRepositoryTrait>,
        accounts: Arc<dyn ManagedAccountRepositoryTrait>,
    ) -> Self {
        Self { ledger, accounts }
    }

    pub fn compute(&self, query: DreQuery) -> Result<DreReport> {
        let from_date = parse_period_start(&query.from)?;
        let to_date = parse_period_end(&query.to)?;

        let entries = self.ledger.query_report_entries(&ReportQuery {
            tenant_id: query.tenant_id.clone(),
            basis: query.basis,
            from_date,
            to_date,
            accounts: query.accounts.clone(),
            account_types: query.account_types.clone(),
            origins: query.origins.clone(),
            min_amount: query.min_amount,
            max_amount: query.max_amount,
            search: query.search.clone(),
        })?;

        // Group on (truncated period, credit account). BTreeMap iteration
        // gives the required ordering: period ascending, then code.
        let mut groups: BTreeMap<(String, String), DreRow> = BTreeMap::new();
        for entry in entries {
            let period = truncate_period(entry.basis_date, query.group_by)
                .format("%Y-%m-%d")
                .to_string();
            let key = (period.clone(), entry.credit_account.clone());
            let row = groups.entry(key).or_insert_with(|| DreRow {
                period,
                account_code: entry.credit_account.clone(),
                account_name: entry
                    .account_name
                    .clone()
                    .unwrap_or_else(|| entry.credit_account.clone()),
                account_type: entry.account_type,
                total: Default::default(),
                entries: 0,
            });
            row.total += entry.amount;
            row.entries += 1;
        }

        let rows: Vec<DreRow> = groups.into_values().collect();
        let summary = build_summary(&rows);

        Ok(DreReport {
            rows,
            summary,
            meta: DreMeta {
                tenant_id: query.tenant_id,
                from: query.from,
                to: query.to,
                basis: query.basis,
                currency: query.currency,
                group_by: query.group_by,
            },
        })
    }

    /// Values available for report filter controls: the tenant's chart of
    /// accounts plus the distinct origins and currencies present in its
    /// ledger.
    pub fn filter_options(&self, tenant_id: &str) -> Result<DreFilterOptions> {
        Ok(DreFilterOptions {
            accounts: self.accounts.list(tenant_id)?,
            account_types: AccountType::all().to_vec(),
            origins: self.ledger.list_distinct_origins(tenant_id)?,
            currencies: self.ledger.list_distinct_currencies(tenant_id)?,
            bases: vec![Basis::Cash, Basis::Accrual],
            groupings: Grouping::all().to_vec(),
        })
    }
}

fn ensure_period(value: &str) -> Result<(i32, u32)> {
    if !PERIOD_RE.is_match(value) {
        return Err(ReportError::InvalidPeriod(value.to_string()).into());
    }
    let (year, month) = value.split_at(4);
    let year: i32 = year.parse().map_err(|_| ReportError::InvalidPeriod(value.to_string()))?;
    let month: u32 = month[1..]
        .parse()
        .map_err(|_| ReportError::InvalidPeriod(value.to_string()))?;
    if !(1..=12).contains(&month) {
        return Err(ReportError::InvalidPeriod(value.to_string()).into());
    }
    Ok((year, month))
}

fn parse_period_start(value: &str) -> Result<NaiveDate> {
    let (year, month) = ensure_period(value)?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ReportError::InvalidPeriod(value.to_string()).into())
}

/// Last day of the month, so the `to` boundary is inclusive.
fn parse_period_end(value: &str) -> Result<NaiveDate> {
    let start = parse_period_start(value)?;
    let next_month = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    };
    next_month
        .map(|d| d - Duration::days(1))
        .ok_or_else(|| ReportError::InvalidPeriod(value.to_string()).into())
}

/// First day of the period containing `date`.
fn truncate_period(date: NaiveDate, grouping: Grouping) -> NaiveDate {
    let truncated = match grouping {
        Grouping::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
        Grouping::Quarter => {
            let quarter_month = ((date.month() - 1) / 3) * 3 + 1;
            NaiveDate::from_ymd_opt(date.year(), quarter_month, 1)
        }
        Grouping::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
    };
    truncated.unwrap_or(date)
}

fn build_summary(rows: &[DreRow]) -> DreSummary {
    let mut summary = DreSummary::default();
    for row in rows {
        summary.total += row.total;

        let type_key = row
            .account_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
        *summary.by_type.entry(type_key).or_default() += row.total;
        *summary.by_period.entry(row.period.clone()).or_default() += row.total;
        *summary
            .by_account
            .entry(row.account_code.clone())
            .or_default() += row.total;
    }
    summary
}
