//! Per-tenant sync scheduling.
//!
//! The scheduler is a state machine over `IntegrationConfig` rows, driven by
//! an injected clock and an injected sync service so ticks are fully
//! deterministic under test. It exclusively owns `next_sync_at` transitions:
//! after every attempt, success or failure, the tenant is pushed into
//! cooling-down so a broken upstream is retried at the next interval instead
//! of being hot-looped.

use chrono::Duration;
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{ErpSyncServiceTrait, IntegrationConfigRepositoryTrait, ModuleSyncResult, SyncRequest};
use crate::Result;

/// Injected time source; `SystemClock` outside tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> chrono::DateTime<chrono::Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}

/// What happened to one tenant during a tick.
#[derive(Debug, Clone)]
pub struct TenantSyncReport {
    pub tenant_id: String,
    pub results: Vec<ModuleSyncResult>,
    pub error: Option<String>,
}

/// Outcome of one scheduling tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Tenants that were due and attempted.
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub tenants: Vec<TenantSyncReport>,
}

pub struct SyncScheduler {
    clock: Arc<dyn Clock>,
    configs: Arc<dyn IntegrationConfigRepositoryTrait>,
    sync_service: Arc<dyn ErpSyncServiceTrait>,
    cancelled: AtomicBool,
}

impl SyncScheduler {
    pub fn new(
        clock: Arc<dyn Clock>,
        configs: Arc<dyn IntegrationConfigRepositoryTrait>,
        sync_service: Arc<dyn ErpSyncServiceTrait>,
    ) -> Self {
        Self {
            clock,
            configs,
            sync_service,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Requests cooperative cancellation; honored between tenants, not
    /// inside a running tenant pipeline.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Runs every due, enabled tenant sequentially.
    pub async fn tick(&self) -> Result<TickReport> {
        let mut report = TickReport::default();
        let now = self.clock.now();
        let configs = self.configs.find_enabled()?;

        for config in configs {
            if self.cancelled.load(Ordering::Relaxed) {
                info!("scheduler tick cancelled before finishing");
                break;
            }
            if !config.is_due(now) {
                continue;
            }

            report.attempted += 1;
            info!("syncing tenant {}", config.tenant_id);

            let request = SyncRequest {
                tenant_id: config.tenant_id.clone(),
                token: config.api_token.clone(),
                modules: config.enabled_modules.clone(),
                date_from: config.last_sync_at.map(|t| t.date_naive()),
                page_size: None,
            };

            let tenant_report = match self.sync_service.sync(request).await {
                Ok(results) => {
                    report.succeeded += 1;
                    TenantSyncReport {
                        tenant_id: config.tenant_id.clone(),
                        results,
                        error: None,
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    error!("sync failed for tenant {}: {}", config.tenant_id, e);
                    TenantSyncReport {
                        tenant_id: config.tenant_id.clone(),
                        results: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            };
            report.tenants.push(tenant_report);

            // Advance the schedule regardless of the outcome; a failing
            // tenant is retried at its next interval.
            let finished = self.clock.now();
            let next = finished + Duration::minutes(config.frequency_minutes());
            if let Err(e) = self
                .configs
                .mark_synced(&config.tenant_id, finished, next)
                .await
            {
                error!(
                    "failed to record sync attempt for tenant {}: {}",
                    config.tenant_id, e
                );
            }
        }

        Ok(report)
    }
}
