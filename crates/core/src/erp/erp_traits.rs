use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::erp_model::*;
use crate::Result;

/// Contract for the integration-config store.
#[async_trait]
pub trait IntegrationConfigRepositoryTrait: Send + Sync {
    fn find(&self, tenant_id: &str) -> Result<Option<IntegrationConfig>>;

    /// All configs with `enabled = true`, any sync state.
    fn find_enabled(&self) -> Result<Vec<IntegrationConfig>>;

    /// Creates or replaces the config for `config.tenant_id`.
    async fn upsert(&self, config: IntegrationConfig) -> Result<IntegrationConfig>;

    /// Records a finished sync attempt. Called by the scheduler only.
    async fn mark_synced(
        &self,
        tenant_id: &str,
        last_sync_at: DateTime<Utc>,
        next_sync_at: DateTime<Utc>,
    ) -> Result<()>;
}

/// Contract for the fetch→map→reconcile pipeline, mockable for scheduler
/// tests.
#[async_trait]
pub trait ErpSyncServiceTrait: Send + Sync {
    async fn sync(&self, request: SyncRequest) -> Result<Vec<ModuleSyncResult>>;
}
