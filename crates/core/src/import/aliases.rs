//! Column-name normalization and the canonical field alias table.
//!
//! Spreadsheet headers are human-entered: accented, mixed case, punctuated.
//! Every header is reduced to a canonical key first; the alias table then
//! maps canonical target fields to priority-ordered lists of accepted
//! spellings.

use std::collections::BTreeMap;

use crate::parsing::RawValue;

/// Substring patterns tried, in order, to recover an amount column when no
/// exact alias matches. Also drives the skip-reason diagnostics.
pub const AMOUNT_CONTAINS_PATTERNS: &[&str] = &[
    "valortotal",
    "totalliquido",
    "valorliquido",
    "valorfaturado",
    "valorrecebido",
    "valorpago",
    "valorpedido",
    "valorservico",
    "valorproduto",
    "bruto",
    "pedido",
    "nota",
    "valor",
    "total",
];

/// Canonical transaction fields a spreadsheet column can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalField {
    Date,
    AccrualDate,
    Debit,
    Credit,
    Amount,
    Currency,
    Origin,
    Memo,
    SourceRef,
}

/// Reduces a human-entered column name to its canonical key: diacritics
/// folded, non-alphanumerics dropped, lowercased. Pure function, independent
/// of any alias table.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .map(fold_diacritic)
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Folds Latin accented letters to their base letter; everything else passes
/// through untouched.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => c,
    }
}

/// Immutable, priority-ordered alias table.
///
/// Lookup returns the first non-empty value following alias order; the
/// separate "contains" lookup scans for substrings and is used only for
/// amount recovery.
#[derive(Debug, Clone)]
pub struct FieldAliases {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

impl Default for FieldAliases {
    fn default() -> Self {
        let table: &[(CanonicalField, &[&str])] = &[
            (
                CanonicalField::Date,
                &[
                    "date",
                    "data",
                    "dataPedido",
                    "dataPedidoVenda",
                    "dataCriacao",
                    "dataEmissao",
                    "dataLancamento",
                    "dataDocumento",
                    "dataCompetencia",
                    "competencia",
                    "periodo",
                ],
            ),
            (
                CanonicalField::AccrualDate,
                &["accrualDate", "dataCompetencia", "competencia", "competenciaData"],
            ),
            (
                CanonicalField::Debit,
                &["debit", "debito", "contaDebito", "contaEntrada"],
            ),
            (
                CanonicalField::Credit,
                &[
                    "credit",
                    "credito",
                    "contaCredito",
                    "contaSaida",
                    "contaGerencial",
                    "contaResultado",
                    "planoConta",
                    "pcg",
                    "categoria",
                ],
            ),
            (CanonicalField::Amount, &["amount", "valor", "total"]),
            (CanonicalField::Currency, &["currency", "moeda"]),
            (CanonicalField::Origin, &["origin", "origem", "fonte"]),
            (
                CanonicalField::Memo,
                &[
                    "memo",
                    "descricao",
                    "historico",
                    "observacao",
                    "descricaoItem",
                    "cliente",
                    "fornecedor",
                    "produto",
                ],
            ),
            (
                CanonicalField::SourceRef,
                &[
                    "sourceRef",
                    "referencia",
                    "documento",
                    "numero",
                    "pedido",
                    "nota",
                    "titulo",
                    "id",
                ],
            ),
        ];

        Self {
            entries: table
                .iter()
                .map(|(field, aliases)| {
                    (*field, aliases.iter().map(|a| normalize_key(a)).collect())
                })
                .collect(),
        }
    }
}

impl FieldAliases {
    /// Normalized alias spellings for a field, in priority order.
    pub fn aliases_for(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }

    /// First non-empty cell matching the field's aliases, in priority order.
    pub fn lookup<'a>(
        &self,
        cells: &'a BTreeMap<String, RawValue>,
        field: CanonicalField,
    ) -> Option<&'a RawValue> {
        self.aliases_for(field)
            .iter()
            .filter_map(|alias| cells.get(alias))
            .find(|value| !value.is_empty())
    }

    /// Substring fallback: first non-empty cell whose key contains one of
    /// the patterns, trying patterns in priority order.
    pub fn lookup_contains<'a>(
        cells: &'a BTreeMap<String, RawValue>,
        patterns: &[&str],
    ) -> Option<&'a RawValue> {
        for pattern in patterns {
            let hit = cells
                .iter()
                .find(|(key, value)| key.contains(pattern) && !value.is_empty());
            if let Some((_, value)) = hit {
                return Some(value);
            }
        }
        None
    }
}
