use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use ledgerflow_erp::ErpResource;

use super::ErpError;
use crate::constants::DEFAULT_SYNC_FREQUENCY_MINUTES;

/// A syncable ERP module, as configured per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErpModule {
    Orders,
    Invoices,
    Financial,
}

impl ErpModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErpModule::Orders => "orders",
            ErpModule::Invoices => "invoices",
            ErpModule::Financial => "financial",
        }
    }

    pub fn all() -> &'static [ErpModule] {
        &[ErpModule::Orders, ErpModule::Invoices, ErpModule::Financial]
    }

    /// The transport resources this module pulls. The financial module is
    /// served by two resources whose records are merged.
    pub fn resources(&self) -> &'static [ErpResource] {
        match self {
            ErpModule::Orders => &[ErpResource::Orders],
            ErpModule::Invoices => &[ErpResource::Invoices],
            ErpModule::Financial => &[ErpResource::Receivables, ErpResource::Payables],
        }
    }
}

impl fmt::Display for ErpModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErpModule {
    type Err = ErpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "orders" => Ok(ErpModule::Orders),
            "invoices" => Ok(ErpModule::Invoices),
            "financial" => Ok(ErpModule::Financial),
            other => Err(ErpError::UnsupportedModule(other.to_string())),
        }
    }
}

/// Where a tenant's integration sits in the sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncState {
    /// Integration disabled; never selected.
    Idle,
    /// Enabled and `next_sync_at` is unset or in the past.
    Due,
    /// Currently being synced by a scheduler tick.
    Running,
    /// Enabled, waiting for `next_sync_at`.
    CoolingDown,
}

/// Per-tenant ERP integration configuration.
///
/// `last_sync_at`/`next_sync_at` are owned by the scheduler; the
/// configuration entrypoint owns everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfig {
    pub tenant_id: String,
    pub api_token: String,
    pub enabled_modules: Vec<ErpModule>,
    pub enabled: bool,
    pub sync_frequency_minutes: Option<i64>,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub next_sync_at: Option<DateTime<Utc>>,
}

impl IntegrationConfig {
    pub fn frequency_minutes(&self) -> i64 {
        self.sync_frequency_minutes
            .unwrap_or(DEFAULT_SYNC_FREQUENCY_MINUTES)
    }

    /// A tenant is due when enabled and `next_sync_at` is unset or has
    /// passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.next_sync_at.map_or(true, |t| t <= now)
    }

    pub fn sync_state(&self, now: DateTime<Utc>) -> SyncState {
        if !self.enabled {
            SyncState::Idle
        } else if self.is_due(now) {
            SyncState::Due
        } else {
            SyncState::CoolingDown
        }
    }
}

/// Input for the configuration entrypoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfigUpdate {
    pub tenant_id: String,
    pub api_token: String,
    pub modules: Vec<ErpModule>,
    pub enabled: Option<bool>,
    pub sync_frequency_minutes: Option<i64>,
}

/// One sync invocation for one tenant.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub tenant_id: String,
    pub token: String,
    pub modules: Vec<ErpModule>,
    /// Lower bound on the upstream date-range filter; absent on first run.
    pub date_from: Option<NaiveDate>,
    pub page_size: Option<usize>,
}

/// Outcome of syncing one module for one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSyncResult {
    pub module: ErpModule,
    /// Records pulled from the upstream API.
    pub pulled: usize,
    /// New ledger rows inserted by this pass.
    pub persisted: usize,
    /// Existing ledger rows updated in place.
    pub updated: usize,
    /// Set when the module's fetch failed; other modules still ran.
    pub error: Option<String>,
}
