//! Ledger module - canonical transaction model, chart of accounts, and the
//! storage contract every pipeline stage is written against.

mod ledger_errors;
mod ledger_model;
mod ledger_traits;

pub use ledger_errors::LedgerError;
pub use ledger_model::{
    default_chart, AccountType, Basis, ManagedAccount, ReportEntry, ReportQuery, Transaction,
    TransactionDraft, TransactionPatch,
};
pub use ledger_traits::{LedgerRepositoryTrait, ManagedAccountRepositoryTrait};
