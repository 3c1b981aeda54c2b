//! Reports module - the DRE aggregation query engine.

mod dre_errors;
mod dre_model;
mod dre_service;


pub use dre_errors::ReportError;
pub use dre_model::{
    DreFilterOptions, DreMeta, DreQuery, DreReport, DreRow, DreSummary, Grouping,
};
pub use dre_service::DreService;
