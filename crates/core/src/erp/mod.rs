//! ERP integration module - entity mapping, sync orchestration, per-tenant
//! scheduling and integration configuration.
//!
//! Transport lives in the `ledgerflow-erp` crate; everything here works
//! against its `ErpApi` trait.

mod config_service;
mod erp_errors;
mod erp_model;
mod erp_traits;
mod mapper;
mod scheduler;
mod sync_service;

#[cfg(test)]
mod mapper_tests;



pub use config_service::IntegrationConfigService;
pub use erp_errors::ErpError;
pub use erp_model::{
    ErpModule, IntegrationConfig, IntegrationConfigUpdate, ModuleSyncResult, SyncRequest,
    SyncState,
};
pub use erp_traits::{ErpSyncServiceTrait, IntegrationConfigRepositoryTrait};
pub use mapper::{map_financial, map_invoice, map_order, MapperConfig};
pub use scheduler::{Clock, SyncScheduler, SystemClock, TenantSyncReport, TickReport};
pub use sync_service::ErpSyncService;
