#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    use crate::import::{SheetRow, SpreadsheetImportService};
    use crate::parsing::RawValue;
    use crate::reconciliation::ReconciliationEngine;
    use crate::test_support::MemoryLedger;

    fn service(ledger: Arc<MemoryLedger>) -> SpreadsheetImportService {
        SpreadsheetImportService::new(Arc::new(ReconciliationEngine::new(ledger)))
    }

    fn row(number: usize, pairs: &[(&str, &str)]) -> SheetRow {
        SheetRow::new(
            number,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), RawValue::Text(v.to_string())))
                .collect(),
        )
    }

    #[tokio::test]
    async fn three_row_sheet_imports_one_and_skips_two() {
        let ledger = MemoryLedger::new();
        let service = service(ledger.clone());

        let rows = vec![
            row(2, &[("Data", "10/01/2025"), ("Valor", "100,00")]),
            row(3, &[("Data", "11/01/2025"), ("Valor", "abc")]),
            row(4, &[("Valor", "50,00")]),
        ];

        let (drafts, skipped) = service.normalize_rows("t1", &rows);
        assert_eq!(drafts.len(), 1);
        assert_eq!(skipped.len(), 2);

        assert_eq!(skipped[0].row, 3);
        assert!(skipped[0].reason.to_lowercase().contains("valor"));
        assert_eq!(skipped[1].row, 4);
        assert!(skipped[1].reason.to_lowercase().contains("data"));

        let engine = ReconciliationEngine::new(ledger.clone());
        let outcome = engine.reconcile("t1", drafts).await.unwrap();
        assert_eq!(outcome.persisted(), 1);
        assert_eq!(ledger.row_count(), 1);
    }

    #[tokio::test]
    async fn defaults_fill_missing_accounts_currency_and_origin() {
        let ledger = MemoryLedger::new();
        let service = service(ledger);

        let rows = vec![row(2, &[("Data", "2025-01-10"), ("Valor", "10,00")])];
        let (drafts, _) = service.normalize_rows("t1", &rows);

        let draft = &drafts[0];
        assert_eq!(draft.debit_account, "Clientes");
        assert_eq!(draft.credit_account, "3.1");
        assert_eq!(draft.currency, "BRL");
        assert_eq!(draft.origin, "import:xlsx");
        assert_eq!(draft.amount, dec!(10.00));
        assert!(draft.source_ref.is_none());
    }

    #[tokio::test]
    async fn multi_account_cells_keep_only_the_first() {
        let ledger = MemoryLedger::new();
        let service = service(ledger);

        let rows = vec![row(
            2,
            &[
                ("Data", "2025-01-10"),
                ("Valor", "10,00"),
                ("Conta Crédito", "3.1; 3.2 | 3.3"),
            ],
        )];
        let (drafts, _) = service.normalize_rows("t1", &rows);
        assert_eq!(drafts[0].credit_account, "3.1");
    }

    #[tokio::test]
    async fn amount_recovers_through_contains_fallback_with_diagnostics() {
        let ledger = MemoryLedger::new();
        let service = service(ledger);

        // No exact amount alias, but a column containing "valor" matches.
        let rows = vec![row(
            2,
            &[("Data", "2025-01-10"), ("Valor Total do Pedido", "77,70")],
        )];
        let (drafts, skipped) = service.normalize_rows("t1", &rows);
        assert!(skipped.is_empty());
        assert_eq!(drafts[0].amount, dec!(77.70));

        // When even the fallback fails, the reason lists the candidates.
        let rows = vec![row(
            2,
            &[("Data", "2025-01-10"), ("Valor Total do Pedido", "n/a")],
        )];
        let (_, skipped) = service.normalize_rows("t1", &rows);
        assert!(skipped[0].reason.contains("colunas:"));
        assert!(skipped[0].reason.contains("valortotaldopedido:n/a"));
    }

    #[tokio::test]
    async fn memo_synthesized_from_document_and_customer() {
        let ledger = MemoryLedger::new();
        let service = service(ledger);

        let rows = vec![row(
            2,
            &[
                ("Data", "2025-01-10"),
                ("Valor", "10,00"),
                ("Número", "88"),
                ("Razão Social", "ACME Ltda"),
            ],
        )];
        let (drafts, _) = service.normalize_rows("t1", &rows);
        assert_eq!(drafts[0].memo.as_deref(), Some("Doc 88 · Cliente: ACME Ltda"));
        // The document column doubles as the source reference.
        assert_eq!(drafts[0].source_ref.as_deref(), Some("88"));
    }

    #[tokio::test]
    async fn explicit_memo_wins_over_synthesis() {
        let ledger = MemoryLedger::new();
        let service = service(ledger);

        let rows = vec![row(
            2,
            &[
                ("Data", "2025-01-10"),
                ("Valor", "10,00"),
                ("Descrição", "Venda balcão"),
                ("Número", "88"),
            ],
        )];
        let (drafts, _) = service.normalize_rows("t1", &rows);
        assert_eq!(drafts[0].memo.as_deref(), Some("Venda balcão"));
    }

    #[tokio::test]
    async fn rows_with_a_source_ref_reconcile_instead_of_duplicating() {
        let ledger = MemoryLedger::new();
        let service = service(ledger.clone());

        let rows = vec![row(
            2,
            &[("Data", "2025-01-10"), ("Valor", "10,00"), ("Documento", "D-1")],
        )];
        let (drafts, _) = service.normalize_rows("t1", &rows);
        let engine = ReconciliationEngine::new(ledger.clone());
        engine.reconcile("t1", drafts.clone()).await.unwrap();
        engine.reconcile("t1", drafts).await.unwrap();
        assert_eq!(ledger.row_count(), 1);
    }
}
