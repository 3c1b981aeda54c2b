#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::import::{normalize_key, CanonicalField, FieldAliases, AMOUNT_CONTAINS_PATTERNS};
    use crate::parsing::RawValue;

    fn cells(pairs: &[(&str, &str)]) -> BTreeMap<String, RawValue> {
        pairs
            .iter()
            .map(|(k, v)| (normalize_key(k), RawValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn keys_fold_accents_case_and_punctuation() {
        assert_eq!(normalize_key("Data de Emissão"), "datadeemissao");
        assert_eq!(normalize_key("VALOR (R$)"), "valorr");
        assert_eq!(normalize_key("conta_crédito"), "contacredito");
        assert_eq!(normalize_key("Histórico"), "historico");
    }

    #[test]
    fn lookup_follows_alias_priority_order() {
        let row = cells(&[("competencia", "2025-02"), ("Data", "2025-01-10")]);
        let aliases = FieldAliases::default();
        // "data" outranks "competencia" for the date field.
        assert_eq!(
            aliases.lookup(&row, CanonicalField::Date),
            Some(&RawValue::Text("2025-01-10".to_string()))
        );
    }

    #[test]
    fn lookup_skips_blank_cells() {
        let mut row = cells(&[("valor", ""), ("total", "88,00")]);
        row.insert("valor".to_string(), RawValue::Text("  ".to_string()));
        let aliases = FieldAliases::default();
        assert_eq!(
            aliases.lookup(&row, CanonicalField::Amount),
            Some(&RawValue::Text("88,00".to_string()))
        );
    }

    #[test]
    fn accented_headers_resolve_to_canonical_fields() {
        let row = cells(&[("Débito", "1.1"), ("Crédito", "3.1")]);
        let aliases = FieldAliases::default();
        assert!(aliases.lookup(&row, CanonicalField::Debit).is_some());
        assert!(aliases.lookup(&row, CanonicalField::Credit).is_some());
    }

    #[test]
    fn contains_fallback_recovers_amount_columns() {
        let row = cells(&[("Valor Total do Pedido", "123,45")]);
        let aliases = FieldAliases::default();
        // No exact alias match ("valortotaldopedido" is not in the table)…
        assert!(aliases.lookup(&row, CanonicalField::Amount).is_none());
        // …but the substring scan finds it.
        assert_eq!(
            FieldAliases::lookup_contains(&row, AMOUNT_CONTAINS_PATTERNS),
            Some(&RawValue::Text("123,45".to_string()))
        );
    }
}
