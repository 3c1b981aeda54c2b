//! Application-wide constants and fallback account codes.
//!
//! The account codes below are the documented fallback order for ingestion
//! paths that cannot resolve an explicit account. Tenants override them via
//! `MapperConfig` / `ImportDefaults` rather than by editing this file.

/// Generic receivable account debited when a source row carries no debit account.
pub const DEFAULT_RECEIVABLE_ACCOUNT: &str = "Clientes";

/// Default revenue account credited when a source row carries no credit account.
pub const DEFAULT_REVENUE_ACCOUNT: &str = "3.1";

/// Default operating-expense account for payable entries.
pub const DEFAULT_EXPENSE_ACCOUNT: &str = "5.1";

/// Cash/bank account credited by payable entries.
pub const DEFAULT_CASH_ACCOUNT: &str = "Caixa/Bancos";

/// Ledger currency assumed when the source does not state one.
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Origin tag stamped on spreadsheet imports.
pub const SPREADSHEET_ORIGIN: &str = "import:xlsx";

/// ERP page size; the upstream API returns at most 100 records per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Sync frequency applied when a tenant config does not set one (minutes).
pub const DEFAULT_SYNC_FREQUENCY_MINUTES: i64 = 1440;
