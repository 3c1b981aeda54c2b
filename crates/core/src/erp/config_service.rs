use chrono::Duration;
use std::sync::Arc;

use super::scheduler::Clock;
use super::{IntegrationConfig, IntegrationConfigRepositoryTrait, IntegrationConfigUpdate};
use crate::constants::DEFAULT_SYNC_FREQUENCY_MINUTES;
use crate::Result;

/// Configuration entrypoint for tenant integrations.
///
/// Owns every `IntegrationConfig` field except the sync timestamps, which
/// belong to the scheduler. Upserting recomputes `next_sync_at` from the new
/// frequency so a tightened schedule takes effect without waiting out the
/// old interval.
pub struct IntegrationConfigService {
    configs: Arc<dyn IntegrationConfigRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl IntegrationConfigService {
    pub fn new(configs: Arc<dyn IntegrationConfigRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self { configs, clock }
    }

    pub async fn upsert_config(&self, input: IntegrationConfigUpdate) -> Result<IntegrationConfig> {
        let existing = self.configs.find(&input.tenant_id)?;
        let now = self.clock.now();
        let frequency = input
            .sync_frequency_minutes
            .unwrap_or(DEFAULT_SYNC_FREQUENCY_MINUTES);

        let config = IntegrationConfig {
            tenant_id: input.tenant_id,
            api_token: input.api_token,
            enabled_modules: input.modules,
            enabled: input.enabled.unwrap_or(true),
            sync_frequency_minutes: input.sync_frequency_minutes,
            last_sync_at: existing.and_then(|c| c.last_sync_at),
            next_sync_at: Some(now + Duration::minutes(frequency)),
        };
        self.configs.upsert(config).await
    }

    pub fn get_status(&self, tenant_id: &str) -> Result<Option<IntegrationConfig>> {
        self.configs.find(tenant_id)
    }
}
