use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use ledgerflow_core::erp::{IntegrationConfig, IntegrationConfigRepositoryTrait};
use ledgerflow_core::Result;

use super::model::IntegrationConfigRow;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::ledger::format_timestamp;
use crate::schema::integration_configs;

/// Diesel-backed integration-config repository.
pub struct IntegrationConfigRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl IntegrationConfigRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl IntegrationConfigRepositoryTrait for IntegrationConfigRepository {
    fn find(&self, tenant_id: &str) -> Result<Option<IntegrationConfig>> {
        let mut conn = get_connection(&self.pool)?;
        let row: Option<IntegrationConfigRow> = integration_configs::table
            .find(tenant_id)
            .first(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(|r| IntegrationConfig::try_from(r).map_err(Into::into))
            .transpose()
    }

    fn find_enabled(&self) -> Result<Vec<IntegrationConfig>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<IntegrationConfigRow> = integration_configs::table
            .filter(integration_configs::enabled.eq(true))
            .order(integration_configs::tenant_id.asc())
            .load(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|r| IntegrationConfig::try_from(r).map_err(Into::into))
            .collect()
    }

    async fn upsert(&self, config: IntegrationConfig) -> Result<IntegrationConfig> {
        let row = IntegrationConfigRow::try_from(config.clone())?;
        self.writer
            .exec(move |conn| {
                diesel::replace_into(integration_configs::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await?;
        Ok(config)
    }

    async fn mark_synced(
        &self,
        tenant_id: &str,
        last_sync_at: DateTime<Utc>,
        next_sync_at: DateTime<Utc>,
    ) -> Result<()> {
        let tenant_id = tenant_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(integration_configs::table.find(&tenant_id))
                    .set((
                        integration_configs::last_sync_at.eq(format_timestamp(last_sync_at)),
                        integration_configs::next_sync_at.eq(format_timestamp(next_sync_at)),
                    ))
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init, spawn_writer};
    use chrono::{Duration, TimeZone};
    use ledgerflow_core::erp::ErpModule;
    use tempfile::tempdir;

    fn config(tenant: &str, enabled: bool) -> IntegrationConfig {
        IntegrationConfig {
            tenant_id: tenant.to_string(),
            api_token: "tok".to_string(),
            enabled_modules: vec![ErpModule::Orders, ErpModule::Financial],
            enabled,
            sync_frequency_minutes: Some(60),
            last_sync_at: None,
            next_sync_at: None,
        }
    }

    #[tokio::test]
    async fn upsert_round_trips_modules_and_timestamps() {
        let dir = tempdir().unwrap();
        let pool = init(dir.path().join("ledger.db").to_str().unwrap()).unwrap();
        let repo = IntegrationConfigRepository::new(pool.clone(), spawn_writer(pool));

        repo.upsert(config("t1", true)).await.unwrap();
        repo.upsert(config("t2", false)).await.unwrap();

        let found = repo.find("t1").unwrap().unwrap();
        assert_eq!(
            found.enabled_modules,
            vec![ErpModule::Orders, ErpModule::Financial]
        );
        assert!(found.last_sync_at.is_none());

        // Only enabled tenants are candidates for scheduling.
        let enabled = repo.find_enabled().unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].tenant_id, "t1");
    }

    #[tokio::test]
    async fn mark_synced_records_the_schedule() {
        let dir = tempdir().unwrap();
        let pool = init(dir.path().join("ledger.db").to_str().unwrap()).unwrap();
        let repo = IntegrationConfigRepository::new(pool.clone(), spawn_writer(pool));

        repo.upsert(config("t1", true)).await.unwrap();

        let now = chrono::Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        repo.mark_synced("t1", now, now + Duration::minutes(60))
            .await
            .unwrap();

        let found = repo.find("t1").unwrap().unwrap();
        assert_eq!(found.last_sync_at, Some(now));
        assert_eq!(found.next_sync_at, Some(now + Duration::minutes(60)));
        assert!(!found.is_due(now + Duration::minutes(30)));
        assert!(found.is_due(now + Duration::minutes(60)));
    }
}
