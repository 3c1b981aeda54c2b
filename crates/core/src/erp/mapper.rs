//! Normalization of ERP payloads into transaction drafts.
//!
//! The upstream API is duck-typed: the same entity arrives wrapped or bare,
//! with items as an array, a singular wrapped object or an `itens`
//! collection, and with identifier/amount fields renamed between versions.
//! Every extractor here treats an unknown shape as "absent field" and never
//! fails; an entity that cannot be normalized simply yields no drafts.

use chrono::{NaiveDate, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use ledgerflow_erp::{payload::scalar_string, FinancialKind};

use super::ErpModule;
use crate::constants::{
    DEFAULT_CASH_ACCOUNT, DEFAULT_CURRENCY, DEFAULT_EXPENSE_ACCOUNT, DEFAULT_RECEIVABLE_ACCOUNT,
    DEFAULT_REVENUE_ACCOUNT,
};
use crate::ledger::TransactionDraft;
use crate::parsing::{parse_amount, parse_date, RawValue};

/// Account defaults and identity tags for the mapper.
///
/// The fallback accounts used to be hard-coded; tenants override them by
/// passing their own config. Fallback order for item accounts: explicit
/// account code, nested category code, classification field, then
/// `revenue_account`.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Reference prefix, e.g. `tiny` in `tiny:order:123`.
    pub source_system: String,
    /// Origin tag segment, e.g. `Tiny` in `ERP:Tiny:orders`.
    pub origin_label: String,
    pub currency: String,
    pub receivable_account: String,
    pub revenue_account: String,
    pub expense_account: String,
    pub cash_account: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            source_system: "tiny".to_string(),
            origin_label: "Tiny".to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            receivable_account: DEFAULT_RECEIVABLE_ACCOUNT.to_string(),
            revenue_account: DEFAULT_REVENUE_ACCOUNT.to_string(),
            expense_account: DEFAULT_EXPENSE_ACCOUNT.to_string(),
            cash_account: DEFAULT_CASH_ACCOUNT.to_string(),
        }
    }
}

impl MapperConfig {
    /// Origin tag for one module, e.g. `ERP:Tiny:orders`.
    pub fn origin(&self, module: ErpModule) -> String {
        format!("ERP:{}:{}", self.origin_label, module)
    }

    fn source_ref(&self, kind: &str, id: &str) -> String {
        format!("{}:{}:{}", self.source_system, kind, id)
    }

    fn item_ref(&self, kind: &str, id: &str, item_id: &str) -> String {
        format!("{}:{}:{}:item:{}", self.source_system, kind, id, item_id)
    }
}

/// Maps one order payload into zero or more drafts: one per line item, or a
/// single draft for the order total when no items are present.
pub fn map_order(order: &Value, tenant_id: &str, cfg: &MapperConfig) -> Vec<TransactionDraft> {
    let base = order.get("pedido").unwrap_or(order);

    let Some(order_id) = str_of(base, &["id", "codigo"])
        .or_else(|| str_of(order, &["id", "numero"]))
        .or_else(|| str_of(base, &["numero"]))
    else {
        warn!("order payload carries no usable identifier, dropping it");
        return Vec::new();
    };
    let number = str_of(base, &["numero"])
        .or_else(|| str_of(order, &["numero"]))
        .unwrap_or_else(|| order_id.clone());

    let issue_date = date_of(base, &["data_pedido", "data_criacao", "data", "data_emissao"])
        .unwrap_or_else(fallback_date);
    let total = amount_of(base, &["valor_total", "total_pedido", "total"]);
    let items = extract_items(first_field(base, &["itens", "items", "produto"]));
    let origin = cfg.origin(ErpModule::Orders);

    if items.is_empty() {
        let Some(total) = total.filter(|t| !t.is_zero()) else {
            return Vec::new();
        };
        return vec![TransactionDraft {
            tenant_id: tenant_id.to_string(),
            date: issue_date,
            accrual_date: Some(issue_date),
            debit_account: cfg.receivable_account.clone(),
            credit_account: cfg.revenue_account.clone(),
            amount: total,
            currency: cfg.currency.clone(),
            memo: Some(format!("Pedido {}", number)),
            origin,
            source_ref: Some(cfg.source_ref("order", &order_id)),
            meta: Some(order.clone()),
        }];
    }

    let share = even_share(base, total, items.len());
    items
        .iter()
        .enumerate()
        .filter_map(|(index, raw_item)| {
            let item = raw_item.get("item").unwrap_or(raw_item);
            let amount = item_amount(item, share)?;
            let memo = item_memo(&format!("Pedido {}", number), item);
            Some(TransactionDraft {
                tenant_id: tenant_id.to_string(),
                date: issue_date,
                accrual_date: Some(issue_date),
                debit_account: cfg.receivable_account.clone(),
                credit_account: resolve_account_code(item, &cfg.revenue_account),
                amount,
                currency: cfg.currency.clone(),
                memo: Some(memo),
                origin: origin.clone(),
                source_ref: Some(cfg.item_ref(
                    "order",
                    &order_id,
                    &item_identity(item, index),
                )),
                meta: Some(json!({ "order": order, "item": item })),
            })
        })
        .collect()
}

/// Maps one invoice payload; identical branching to orders, rooted under
/// the invoice wrapper.
pub fn map_invoice(invoice: &Value, tenant_id: &str, cfg: &MapperConfig) -> Vec<TransactionDraft> {
    let base = invoice
        .get("nota")
        .or_else(|| invoice.get("nota_fiscal"))
        .unwrap_or(invoice);

    let Some(invoice_id) = str_of(base, &["id"])
        .or_else(|| str_of(invoice, &["id"]))
        .or_else(|| str_of(base, &["numero"]))
    else {
        warn!("invoice payload carries no usable identifier, dropping it");
        return Vec::new();
    };
    let number = str_of(base, &["numero"])
        .or_else(|| str_of(invoice, &["numero"]))
        .unwrap_or_else(|| invoice_id.clone());

    let issue_date = date_of(base, &["data_emissao", "data"])
        .or_else(|| date_of(invoice, &["data_emissao"]))
        .unwrap_or_else(fallback_date);
    let total = amount_of(base, &["valor_total"]).or_else(|| amount_of(invoice, &["valor_total"]));
    let items = extract_items(first_field(base, &["itens", "items"]));
    let origin = cfg.origin(ErpModule::Invoices);

    if items.is_empty() {
        let Some(total) = total.filter(|t| !t.is_zero()) else {
            return Vec::new();
        };
        return vec![TransactionDraft {
            tenant_id: tenant_id.to_string(),
            date: issue_date,
            accrual_date: Some(issue_date),
            debit_account: cfg.receivable_account.clone(),
            credit_account: cfg.revenue_account.clone(),
            amount: total,
            currency: cfg.currency.clone(),
            memo: Some(format!("Nota fiscal {}", number)),
            origin,
            source_ref: Some(cfg.source_ref("invoice", &invoice_id)),
            meta: Some(invoice.clone()),
        }];
    }

    let share = even_share(base, total, items.len());
    items
        .iter()
        .enumerate()
        .filter_map(|(index, raw_item)| {
            let item = raw_item.get("item").unwrap_or(raw_item);
            let amount = item_amount(item, share)?;
            let memo = item_memo(&format!("Nota {}", number), item);
            Some(TransactionDraft {
                tenant_id: tenant_id.to_string(),
                date: issue_date,
                accrual_date: Some(issue_date),
                debit_account: cfg.receivable_account.clone(),
                credit_account: resolve_account_code(item, &cfg.revenue_account),
                amount,
                currency: cfg.currency.clone(),
                memo: Some(memo),
                origin: origin.clone(),
                source_ref: Some(cfg.item_ref(
                    "invoice",
                    &invoice_id,
                    &item_identity(item, index),
                )),
                meta: Some(json!({ "invoice": invoice, "item": item })),
            })
        })
        .collect()
}

/// Maps one financial entry (receivable or payable) into at most one draft.
///
/// Cancelled entries and entries with no resolvable non-zero amount yield
/// nothing. Payables are signed negative.
pub fn map_financial(
    entry: &Value,
    tenant_id: &str,
    cfg: &MapperConfig,
    kind_hint: Option<FinancialKind>,
) -> Vec<TransactionDraft> {
    let base = entry
        .get("lancamento")
        .or_else(|| entry.get("titulo"))
        .unwrap_or(entry);

    let status = str_of(base, &["situacao"])
        .or_else(|| str_of(entry, &["situacao"]))
        .unwrap_or_default()
        .to_lowercase();
    if status.starts_with("cancel") {
        return Vec::new();
    }

    let Some(entry_id) = str_of(base, &["id"])
        .or_else(|| str_of(entry, &["id"]))
        .or_else(|| str_of(base, &["numero"]))
    else {
        warn!("financial entry carries no usable identifier, dropping it");
        return Vec::new();
    };

    let kind = kind_hint.unwrap_or_else(|| {
        let nature = str_of(base, &["tipo", "natureza"])
            .unwrap_or_else(|| "receber".to_string())
            .to_lowercase();
        if nature.starts_with('p') {
            FinancialKind::Payable
        } else {
            FinancialKind::Receivable
        }
    });

    let amount = amount_of(base, &["valor", "valor_titulo"])
        .or_else(|| amount_of(entry, &["valor"]))
        .filter(|a| !a.is_zero())
        .or_else(|| installments_total(base))
        .map(|a| a.abs());
    let Some(amount) = amount.filter(|a| !a.is_zero()) else {
        return Vec::new();
    };
    let amount = match kind {
        FinancialKind::Payable => -amount,
        FinancialKind::Receivable => amount,
    };

    let date = date_of(base, &["data_vencimento", "data_pagamento"])
        .or_else(|| date_of(entry, &["data_vencimento", "data_pagamento"]))
        .unwrap_or_else(fallback_date);

    let description = str_of(base, &["descricao", "historico"])
        .or_else(|| str_of(entry, &["descricao"]))
        .unwrap_or_else(|| "Lançamento financeiro".to_string());
    let category = str_of(base, &["categoria", "conta_contabil"]);
    let memo = match category {
        Some(cat) => format!("{} · {}", description, cat),
        None => description,
    };

    let (debit, credit) = match kind {
        FinancialKind::Receivable => (cfg.receivable_account.clone(), cfg.revenue_account.clone()),
        FinancialKind::Payable => (cfg.expense_account.clone(), cfg.cash_account.clone()),
    };

    vec![TransactionDraft {
        tenant_id: tenant_id.to_string(),
        date,
        accrual_date: Some(date),
        debit_account: debit,
        credit_account: credit,
        amount,
        currency: cfg.currency.clone(),
        memo: Some(memo),
        origin: cfg.origin(ErpModule::Financial),
        source_ref: Some(cfg.source_ref("financial", &entry_id)),
        meta: Some(entry.clone()),
    }]
}

// === field extraction helpers ===

fn first_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| value.get(k))
        .find(|v| !v.is_null())
}

fn str_of(value: &Value, keys: &[&str]) -> Option<String> {
    first_field(value, keys).and_then(scalar_string)
}

fn amount_of(value: &Value, keys: &[&str]) -> Option<Decimal> {
    first_field(value, keys).and_then(|v| parse_amount(&RawValue::from_json(v)))
}

fn date_of(value: &Value, keys: &[&str]) -> Option<NaiveDate> {
    first_field(value, keys).and_then(|v| parse_date(&RawValue::from_json(v)))
}

/// Entities sometimes arrive without any parsable date; the ingestion date
/// is the documented fallback.
fn fallback_date() -> NaiveDate {
    Utc::now().date_naive()
}

/// Flattens the known item-collection shapes into a list.
fn extract_items(collection: Option<&Value>) -> Vec<Value> {
    let Some(collection) = collection else {
        return Vec::new();
    };
    if let Some(items) = collection.as_array() {
        return items.clone();
    }
    if let Some(item) = collection.get("item") {
        if let Some(items) = item.as_array() {
            return items.clone();
        }
        if !item.is_null() {
            return vec![item.clone()];
        }
    }
    if let Some(items) = collection.get("itens").and_then(Value::as_array) {
        return items.clone();
    }
    Vec::new()
}

/// Account-code fallback chain for a line item: explicit code, nested
/// category codes, classification field, then the configured default.
fn resolve_account_code(item: &Value, fallback: &str) -> String {
    str_of(item, &["accountCode"])
        .or_else(|| nested_code(item, "conta_gerencial"))
        .or_else(|| str_of(item, &["contaGerencial"]))
        .or_else(|| nested_code(item, "categoria"))
        .or_else(|| nested_code(item, "plano_contas"))
        .or_else(|| str_of(item, &["classificacao"]))
        .unwrap_or_else(|| fallback.to_string())
}

fn nested_code(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.get("codigo"))
        .and_then(scalar_string)
}

/// Amount for one line item: explicit total, else unit price × quantity,
/// else the pre-computed even share. Zero resolves to `None`.
fn item_amount(item: &Value, share: Option<Decimal>) -> Option<Decimal> {
    amount_of(item, &["valor_total", "valor", "total"])
        .filter(|a| !a.is_zero())
        .or_else(|| {
            let unit = amount_of(item, &["valor_unitario", "preco", "preco_unitario"])?;
            let qty = amount_of(item, &["quantidade", "qtde"])?;
            Some(unit * qty)
        })
        .filter(|a| !a.is_zero())
        .or(share)
        .filter(|a| !a.is_zero())
}

/// Even split of the entity total (or of its summed installments) across
/// `count` items, used when an item has no resolvable amount of its own.
fn even_share(base: &Value, total: Option<Decimal>, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    let whole = total
        .filter(|t| !t.is_zero())
        .or_else(|| installments_total(base))?;
    Some(whole / Decimal::from(count as u64))
}

/// Sum of installment (`parcelas`) values, in any of the collection shapes.
fn installments_total(base: &Value) -> Option<Decimal> {
    let installments = extract_items(first_field(base, &["parcelas"]));
    if installments.is_empty() {
        return None;
    }
    let total: Decimal = installments
        .iter()
        .map(|p| {
            let parcela = p.get("parcela").unwrap_or(p);
            amount_of(parcela, &["valor"]).unwrap_or_default()
        })
        .sum();
    (!total.is_zero()).then_some(total)
}

fn item_identity(item: &Value, index: usize) -> String {
    str_of(item, &["id", "codigo"]).unwrap_or_else(|| index.to_string())
}

fn item_memo(prefix: &str, item: &Value) -> String {
    match str_of(item, &["descricao", "nome", "descricao_produto"]) {
        Some(description) => format!("{} · {}", prefix, description),
        None => prefix.to_string(),
    }
}
