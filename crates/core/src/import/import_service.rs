use log::debug;
use std::sync::Arc;

use super::aliases::{CanonicalField, FieldAliases, AMOUNT_CONTAINS_PATTERNS};
use super::import_model::{ImportDefaults, ImportOutcome, SkippedRow};
use super::workbook::{read_transactions_sheet, SheetRow};
use crate::ledger::TransactionDraft;
use crate::parsing::{parse_amount, parse_date};
use crate::reconciliation::ReconciliationEngine;
use crate::Result;

/// How many candidate amount columns to include in a skip reason.
const AMOUNT_DIAGNOSTIC_LIMIT: usize = 6;

/// Normalizes an uploaded spreadsheet into transaction drafts and hands them
/// to the reconciliation engine.
///
/// Row-level problems never abort the import: the offending row is recorded
/// with a reason and the batch continues.
pub struct SpreadsheetImportService {
    reconciliation: Arc<ReconciliationEngine>,
    aliases: FieldAliases,
    defaults: ImportDefaults,
}

impl SpreadsheetImportService {
    pub fn new(reconciliation: Arc<ReconciliationEngine>) -> Self {
        Self::with_defaults(reconciliation, ImportDefaults::default())
    }

    pub fn with_defaults(
        reconciliation: Arc<ReconciliationEngine>,
        defaults: ImportDefaults,
    ) -> Self {
        Self {
            reconciliation,
            aliases: FieldAliases::default(),
            defaults,
        }
    }

    /// Imports one uploaded workbook for a tenant.
    pub async fn import(&self, tenant_id: &str, bytes: &[u8]) -> Result<ImportOutcome> {
        let sheet = read_transactions_sheet(bytes)?;

        if sheet.rows.is_empty() {
            return Ok(ImportOutcome {
                imported: 0,
                skipped: 0,
                sheet: sheet.name,
                skipped_rows: Vec::new(),
                warning: Some("A planilha não contém linhas para importar.".to_string()),
            });
        }

        let (drafts, skipped_rows) = self.normalize_rows(tenant_id, &sheet.rows);
        debug!(
            "normalized sheet \"{}\": {} drafts, {} skipped",
            sheet.name,
            drafts.len(),
            skipped_rows.len()
        );

        if drafts.is_empty() {
            return Ok(ImportOutcome {
                imported: 0,
                skipped: skipped_rows.len(),
                sheet: sheet.name,
                skipped_rows,
                warning: Some(
                    "Nenhuma linha válida encontrada. Verifique os campos obrigatórios."
                        .to_string(),
                ),
            });
        }

        let outcome = self.reconciliation.reconcile(tenant_id, drafts).await?;

        Ok(ImportOutcome {
            imported: outcome.persisted(),
            skipped: skipped_rows.len(),
            sheet: sheet.name,
            skipped_rows,
            warning: None,
        })
    }

    /// Normalizes data rows into drafts plus skip records.
    pub fn normalize_rows(
        &self,
        tenant_id: &str,
        rows: &[SheetRow],
    ) -> (Vec<TransactionDraft>, Vec<SkippedRow>) {
        let mut drafts = Vec::new();
        let mut skipped = Vec::new();

        for row in rows {
            match self.normalize_row(tenant_id, row) {
                Ok(draft) => drafts.push(draft),
                Err(reason) => skipped.push(SkippedRow {
                    row: row.number,
                    reason,
                }),
            }
        }
        (drafts, skipped)
    }

    fn normalize_row(
        &self,
        tenant_id: &str,
        row: &SheetRow,
    ) -> std::result::Result<TransactionDraft, String> {
        let date = self
            .aliases
            .lookup(&row.cells, CanonicalField::Date)
            .and_then(parse_date)
            .ok_or_else(|| "Data ausente ou inválida".to_string())?;

        let accrual_date = self
            .aliases
            .lookup(&row.cells, CanonicalField::AccrualDate)
            .and_then(parse_date);

        let amount_raw = self
            .aliases
            .lookup(&row.cells, CanonicalField::Amount)
            .or_else(|| FieldAliases::lookup_contains(&row.cells, AMOUNT_CONTAINS_PATTERNS));
        let amount = amount_raw
            .and_then(parse_amount)
            .ok_or_else(|| self.amount_skip_reason(row))?;

        let debit = resolve_account(
            self.aliases
                .lookup(&row.cells, CanonicalField::Debit)
                .map(|v| v.display()),
            &self.defaults.debit_account,
        );
        let credit = resolve_account(
            self.aliases
                .lookup(&row.cells, CanonicalField::Credit)
                .map(|v| v.display()),
            &self.defaults.credit_account,
        );

        let currency = self
            .aliases
            .lookup(&row.cells, CanonicalField::Currency)
            .map(|v| v.display())
            .unwrap_or_else(|| self.defaults.currency.clone());
        let origin = self
            .aliases
            .lookup(&row.cells, CanonicalField::Origin)
            .map(|v| v.display())
            .unwrap_or_else(|| self.defaults.origin.clone());
        let source_ref = self
            .aliases
            .lookup(&row.cells, CanonicalField::SourceRef)
            .map(|v| v.display());

        Ok(TransactionDraft {
            tenant_id: tenant_id.to_string(),
            date,
            accrual_date,
            debit_account: debit,
            credit_account: credit,
            amount,
            currency,
            memo: self.build_memo(row),
            origin,
            source_ref,
            meta: Some(row.original.clone()),
        })
    }

    /// Skip reason for an unresolvable amount, carrying up to six candidate
    /// column/value pairs so the operator can see what was there.
    fn amount_skip_reason(&self, row: &SheetRow) -> String {
        let columns: Vec<String> = row
            .cells
            .iter()
            .filter(|(key, _)| key.contains("valor") || key.contains("total"))
            .take(AMOUNT_DIAGNOSTIC_LIMIT)
            .map(|(key, value)| format!("{}:{}", key, value.display()))
            .collect();

        if columns.is_empty() {
            "Valor ausente ou inválido".to_string()
        } else {
            format!("Valor ausente ou inválido (colunas: {})", columns.join(", "))
        }
    }

    /// Memo from the memo aliases, else synthesized from any discoverable
    /// document number and customer name.
    fn build_memo(&self, row: &SheetRow) -> Option<String> {
        if let Some(memo) = self.aliases.lookup(&row.cells, CanonicalField::Memo) {
            return Some(memo.display());
        }

        let customer = ["cliente", "razaosocial"]
            .iter()
            .filter_map(|key| row.cells.get(*key))
            .find(|v| !v.is_empty());
        let document = ["numero", "pedido", "nota", "documento"]
            .iter()
            .filter_map(|key| row.cells.get(*key))
            .find(|v| !v.is_empty());

        let parts: Vec<String> = [
            document.map(|d| format!("Doc {}", d.display())),
            customer.map(|c| format!("Cliente: {}", c.display())),
        ]
        .into_iter()
        .flatten()
        .collect();

        (!parts.is_empty()).then(|| parts.join(" · "))
    }
}

/// Keeps only the first account when a cell carries several separated by
/// `;`, `,` or `|`.
fn resolve_account(value: Option<String>, default: &str) -> String {
    value
        .and_then(|v| {
            v.split([';', ',', '|'])
                .map(str::trim)
                .find(|part| !part.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| default.to_string())
}
