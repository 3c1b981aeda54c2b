#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::erp::{map_financial, map_invoice, map_order, MapperConfig};
    use ledgerflow_erp::FinancialKind;

    fn cfg() -> MapperConfig {
        MapperConfig::default()
    }

    #[test]
    fn order_without_items_maps_to_a_single_total_draft() {
        let order = json!({
            "pedido": {
                "id": 101,
                "numero": "P-44",
                "data_pedido": "2025-03-10",
                "valor_total": "1.500,00"
            }
        });
        let drafts = map_order(&order, "t1", &cfg());
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.amount, dec!(1500.00));
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(draft.debit_account, "Clientes");
        assert_eq!(draft.credit_account, "3.1");
        assert_eq!(draft.memo.as_deref(), Some("Pedido P-44"));
        assert_eq!(draft.origin, "ERP:Tiny:orders");
        assert_eq!(draft.source_ref.as_deref(), Some("tiny:order:101"));
    }

    #[test]
    fn order_with_zero_total_and_no_items_is_dropped() {
        let order = json!({"pedido": {"id": 1, "valor_total": 0}});
        assert!(map_order(&order, "t1", &cfg()).is_empty());
    }

    #[test]
    fn order_without_identifier_is_dropped() {
        let order = json!({"pedido": {"valor_total": "10,00"}});
        assert!(map_order(&order, "t1", &cfg()).is_empty());
    }

    #[test]
    fn order_items_resolve_account_and_amount_per_item() {
        let order = json!({
            "pedido": {
                "id": "7",
                "numero": "7",
                "data_pedido": "15/02/2025",
                "itens": [
                    {"item": {"id": "a", "descricao": "Serviço", "valor_total": "100,00",
                              "conta_gerencial": {"codigo": "3.3"}}},
                    {"item": {"id": "b", "valor_unitario": "25,00", "quantidade": 2}}
                ]
            }
        });
        let drafts = map_order(&order, "t1", &cfg());
        assert_eq!(drafts.len(), 2);

        assert_eq!(drafts[0].credit_account, "3.3");
        assert_eq!(drafts[0].amount, dec!(100.00));
        assert_eq!(drafts[0].memo.as_deref(), Some("Pedido 7 · Serviço"));
        assert_eq!(drafts[0].source_ref.as_deref(), Some("tiny:order:7:item:a"));

        // No explicit total: unit price × quantity.
        assert_eq!(drafts[1].credit_account, "3.1");
        assert_eq!(drafts[1].amount, dec!(50.00));
        assert_eq!(drafts[1].source_ref.as_deref(), Some("tiny:order:7:item:b"));
    }

    #[test]
    fn amountless_items_fall_back_to_an_even_share_of_the_total() {
        let order = json!({
            "pedido": {
                "id": 9,
                "valor_total": "90,00",
                "itens": [
                    {"item": {"descricao": "um"}},
                    {"item": {"descricao": "dois"}},
                    {"item": {"descricao": "tres"}}
                ]
            }
        });
        let drafts = map_order(&order, "t1", &cfg());
        assert_eq!(drafts.len(), 3);
        assert!(drafts.iter().all(|d| d.amount == dec!(30)));
        // Index-based item refs when items carry no id.
        assert_eq!(drafts[2].source_ref.as_deref(), Some("tiny:order:9:item:2"));
    }

    #[test]
    fn singular_wrapped_item_shape_is_flattened() {
        let order = json!({
            "pedido": {
                "id": 3,
                "itens": {"item": {"id": 1, "valor": "42,00"}}
            }
        });
        let drafts = map_order(&order, "t1", &cfg());
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].amount, dec!(42.00));
    }

    #[test]
    fn invoice_unwraps_nota_fiscal_and_stamps_invoice_refs() {
        let invoice = json!({
            "nota_fiscal": {
                "id": 55,
                "numero": "NF-9",
                "data_emissao": "2025-01-20 14:00:00",
                "valor_total": "200,00"
            }
        });
        let drafts = map_invoice(&invoice, "t1", &cfg());
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].memo.as_deref(), Some("Nota fiscal NF-9"));
        assert_eq!(drafts[0].origin, "ERP:Tiny:invoices");
        assert_eq!(drafts[0].source_ref.as_deref(), Some("tiny:invoice:55"));
        assert_eq!(
            drafts[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
        );
    }

    #[test]
    fn cancelled_financial_entries_never_produce_a_transaction() {
        let entry = json!({
            "id": 10,
            "situacao": "cancelada",
            "valor": "999,99",
            "data_vencimento": "2025-04-01"
        });
        assert!(map_financial(&entry, "t1", &cfg(), Some(FinancialKind::Receivable)).is_empty());
    }

    #[test]
    fn payables_are_signed_negative_with_expense_accounts() {
        let entry = json!({
            "id": 77,
            "valor": "300,00",
            "data_vencimento": "10/03/2025",
            "descricao": "Aluguel",
            "categoria": "Despesas Fixas"
        });
        let drafts = map_financial(&entry, "t1", &cfg(), Some(FinancialKind::Payable));
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.amount, dec!(-300.00));
        assert_eq!(draft.debit_account, "5.1");
        assert_eq!(draft.credit_account, "Caixa/Bancos");
        assert_eq!(draft.memo.as_deref(), Some("Aluguel · Despesas Fixas"));
        assert_eq!(draft.source_ref.as_deref(), Some("tiny:financial:77"));
    }

    #[test]
    fn receivable_kind_is_inferred_from_nature_when_unhinted() {
        let payable = json!({"id": 1, "tipo": "pagar", "valor": "50,00"});
        let receivable = json!({"id": 2, "natureza": "receber", "valor": "50,00"});
        assert_eq!(
            map_financial(&payable, "t1", &cfg(), None)[0].amount,
            dec!(-50.00)
        );
        assert_eq!(
            map_financial(&receivable, "t1", &cfg(), None)[0].amount,
            dec!(50.00)
        );
    }

    #[test]
    fn financial_amount_falls_back_to_summed_installments() {
        let entry = json!({
            "titulo": {
                "id": 8,
                "parcelas": [
                    {"parcela": {"valor": "100,00"}},
                    {"parcela": {"valor": "150,00"}}
                ]
            }
        });
        let drafts = map_financial(&entry, "t1", &cfg(), Some(FinancialKind::Receivable));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].amount, dec!(250.00));
    }

    #[test]
    fn zero_amount_financial_entries_are_dropped() {
        let entry = json!({"id": 4, "valor": "0,00"});
        assert!(map_financial(&entry, "t1", &cfg(), Some(FinancialKind::Receivable)).is_empty());
    }

    #[test]
    fn repeated_mapping_produces_identical_references() {
        let order = json!({
            "pedido": {"id": 12, "valor_total": "10,00", "data_pedido": "2025-05-05"}
        });
        let first = map_order(&order, "t1", &cfg());
        let second = map_order(&order, "t1", &cfg());
        assert_eq!(first[0].source_ref, second[0].source_ref);
    }

    #[test]
    fn custom_config_overrides_default_accounts_and_tags() {
        let mut custom = cfg();
        custom.source_system = "erpx".to_string();
        custom.origin_label = "ErpX".to_string();
        custom.revenue_account = "4.9".to_string();

        let order = json!({"pedido": {"id": 1, "valor_total": "10,00"}});
        let drafts = map_order(&order, "t1", &custom);
        assert_eq!(drafts[0].credit_account, "4.9");
        assert_eq!(drafts[0].origin, "ERP:ErpX:orders");
        assert_eq!(drafts[0].source_ref.as_deref(), Some("erpx:order:1"));
    }
}
