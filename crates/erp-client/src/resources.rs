//! Resource catalog: endpoint spellings, collection wrapper keys and
//! identifier probes for each ERP resource.

use chrono::NaiveDate;

/// Whether a financial entry moves money in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialKind {
    Receivable,
    Payable,
}

/// A fetchable ERP resource.
///
/// The financial module is served by two resources (receivables and
/// payables); callers merge them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErpResource {
    Orders,
    Invoices,
    Receivables,
    Payables,
}

impl ErpResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErpResource::Orders => "orders",
            ErpResource::Invoices => "invoices",
            ErpResource::Receivables => "receivables",
            ErpResource::Payables => "payables",
        }
    }

    /// Search endpoint spellings, in fallback priority order.
    pub fn search_endpoints(&self) -> &'static [&'static str] {
        match self {
            ErpResource::Orders => &["pedidos.pesquisa.php", "pedidos.pesquisar.php"],
            ErpResource::Invoices => &["notas.fiscais.pesquisa.php", "nota.fiscal.pesquisa.php"],
            ErpResource::Receivables => &["contas.receber.pesquisa.php", "conta.receber.pesquisa.php"],
            ErpResource::Payables => &["contas.pagar.pesquisa.php", "conta.pagar.pesquisa.php"],
        }
    }

    /// Detail endpoint spellings, in fallback priority order.
    pub fn detail_endpoints(&self) -> &'static [&'static str] {
        match self {
            ErpResource::Orders => &["pedido.obter.php"],
            ErpResource::Invoices => &["nota.fiscal.obter.php"],
            ErpResource::Receivables => &["conta.receber.obter.php", "conta.obter.php"],
            ErpResource::Payables => &["conta.pagar.obter.php", "conta.obter.php"],
        }
    }

    /// Plural/singular wrapper keys used by search responses.
    pub fn collection_keys(&self) -> (&'static str, &'static str) {
        match self {
            ErpResource::Orders => ("pedidos", "pedido"),
            ErpResource::Invoices => ("notas_fiscais", "nota_fiscal"),
            ErpResource::Receivables => ("contas_receber", "conta_receber"),
            ErpResource::Payables => ("contas_pagar", "conta_pagar"),
        }
    }

    /// Identifier fields probed on a summary before a detail call, in
    /// priority order.
    pub fn detail_id_keys(&self) -> &'static [&'static str] {
        match self {
            ErpResource::Orders => &["id", "pedido_id", "numero"],
            ErpResource::Invoices => &["id", "nota_id", "numero"],
            ErpResource::Receivables | ErpResource::Payables => {
                &["id", "conta_id", "documento", "numero"]
            }
        }
    }

    /// Keys under which a detail response wraps the record, probed in order.
    pub fn detail_containers(&self) -> &'static [&'static str] {
        match self {
            ErpResource::Orders => &["pedido"],
            ErpResource::Invoices => &["nota_fiscal", "nota"],
            ErpResource::Receivables => &["conta_receber", "conta"],
            ErpResource::Payables => &["conta_pagar", "conta"],
        }
    }

    pub fn is_financial(&self) -> bool {
        matches!(self, ErpResource::Receivables | ErpResource::Payables)
    }

    pub fn financial_kind(&self) -> Option<FinancialKind> {
        match self {
            ErpResource::Receivables => Some(FinancialKind::Receivable),
            ErpResource::Payables => Some(FinancialKind::Payable),
            _ => None,
        }
    }
}

/// Date-range filter applied to a search call.
///
/// Orders and invoices filter by update/issue date; financial resources
/// filter by issue/due date, with the update range doubling as the due
/// range when no explicit one is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchFilter {
    pub updated_from: Option<NaiveDate>,
    pub updated_to: Option<NaiveDate>,
    pub issued_from: Option<NaiveDate>,
    pub issued_to: Option<NaiveDate>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}

impl SearchFilter {
    /// Form parameters for one search call against `resource`.
    ///
    /// Orders/invoices take ISO dates; the financial endpoints document
    /// `dd/mm/yyyy`, so dates are converted for them.
    pub fn params(&self, resource: ErpResource) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if resource.is_financial() {
            if let Some(d) = self.issued_from {
                params.push(("data_ini_emissao", to_erp_date(d)));
            }
            if let Some(d) = self.issued_to {
                params.push(("data_fim_emissao", to_erp_date(d)));
            }
            if let Some(d) = self.due_from.or(self.updated_from) {
                params.push(("data_ini_vencimento", to_erp_date(d)));
            }
            if let Some(d) = self.due_to.or(self.updated_to) {
                params.push(("data_fim_vencimento", to_erp_date(d)));
            }
        } else {
            if let Some(d) = self.updated_from {
                params.push(("dataAtualizacao", to_iso_date(d)));
            }
            if let Some(d) = self.updated_to {
                params.push(("dataFinalAtualizacao", to_iso_date(d)));
            }
            if let Some(d) = self.issued_from {
                params.push(("dataInicial", to_iso_date(d)));
            }
            if let Some(d) = self.issued_to {
                params.push(("dataFinal", to_iso_date(d)));
            }
        }
        params
    }
}

fn to_iso_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// `dd/mm/yyyy`, the format the financial endpoints expect.
pub fn to_erp_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}
