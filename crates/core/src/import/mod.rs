//! Spreadsheet import module - field alias resolution, workbook reading and
//! normalization of arbitrary tabular layouts into transaction drafts.

mod aliases;
mod import_errors;
mod import_model;
mod import_service;
mod workbook;

#[cfg(test)]
mod aliases_tests;

#[cfg(test)]
mod import_service_tests;

pub use aliases::{normalize_key, CanonicalField, FieldAliases, AMOUNT_CONTAINS_PATTERNS};
pub use import_errors::ImportError;
pub use import_model::{ImportDefaults, ImportOutcome, SkippedRow};
pub use import_service::SpreadsheetImportService;
pub use workbook::{read_transactions_sheet, SheetData, SheetRow};
