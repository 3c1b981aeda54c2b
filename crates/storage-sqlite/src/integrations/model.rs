use diesel::prelude::*;

use ledgerflow_core::erp::IntegrationConfig;

use crate::errors::StorageError;
use crate::ledger::{format_timestamp, parse_timestamp};
use crate::schema::integration_configs;

/// Database row for a tenant integration config. Enabled modules are stored
/// as a JSON array of module names.
#[derive(Queryable, Selectable, Identifiable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = integration_configs)]
#[diesel(primary_key(tenant_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IntegrationConfigRow {
    pub tenant_id: String,
    pub api_token: String,
    pub enabled_modules: String,
    pub enabled: bool,
    pub sync_frequency_minutes: Option<i64>,
    pub last_sync_at: Option<String>,
    pub next_sync_at: Option<String>,
}

impl TryFrom<IntegrationConfig> for IntegrationConfigRow {
    type Error = StorageError;

    fn try_from(config: IntegrationConfig) -> Result<Self, Self::Error> {
        let enabled_modules = serde_json::to_string(&config.enabled_modules)
            .map_err(|e| StorageError::Corrupt(format!("enabled modules: {}", e)))?;
        Ok(Self {
            tenant_id: config.tenant_id,
            api_token: config.api_token,
            enabled_modules,
            enabled: config.enabled,
            sync_frequency_minutes: config.sync_frequency_minutes,
            last_sync_at: config.last_sync_at.map(format_timestamp),
            next_sync_at: config.next_sync_at.map(format_timestamp),
        })
    }
}

impl TryFrom<IntegrationConfigRow> for IntegrationConfig {
    type Error = StorageError;

    fn try_from(row: IntegrationConfigRow) -> Result<Self, Self::Error> {
        let enabled_modules = serde_json::from_str(&row.enabled_modules).map_err(|e| {
            StorageError::Corrupt(format!(
                "enabled modules for tenant {}: {}",
                row.tenant_id, e
            ))
        })?;
        Ok(Self {
            enabled_modules,
            last_sync_at: row.last_sync_at.as_deref().map(parse_timestamp).transpose()?,
            next_sync_at: row.next_sync_at.as_deref().map(parse_timestamp).transpose()?,
            tenant_id: row.tenant_id,
            api_token: row.api_token,
            enabled: row.enabled,
            sync_frequency_minutes: row.sync_frequency_minutes,
        })
    }
}
