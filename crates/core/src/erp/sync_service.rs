use async_trait::async_trait;
use log::{debug, error};
use serde_json::Value;
use std::sync::Arc;

use ledgerflow_erp::{collect_resource, ErpApi, ErpResource, SearchFilter};

use super::mapper::{map_financial, map_invoice, map_order, MapperConfig};
use super::{ErpError, ErpModule, ErpSyncServiceTrait, ModuleSyncResult, SyncRequest};
use crate::constants::DEFAULT_PAGE_SIZE;
use crate::ledger::TransactionDraft;
use crate::reconciliation::ReconciliationEngine;
use crate::Result;

/// Drives the fetch→map→reconcile pipeline for one tenant.
///
/// A failing module is reported in its result row and never stops the other
/// requested modules; only a missing token fails the call as a whole.
pub struct ErpSyncService {
    api: Arc<dyn ErpApi>,
    reconciliation: Arc<ReconciliationEngine>,
    mapper: MapperConfig,
}

impl ErpSyncService {
    pub fn new(
        api: Arc<dyn ErpApi>,
        reconciliation: Arc<ReconciliationEngine>,
        mapper: MapperConfig,
    ) -> Self {
        Self {
            api,
            reconciliation,
            mapper,
        }
    }

    async fn sync_module(
        &self,
        request: &SyncRequest,
        module: ErpModule,
        filter: &SearchFilter,
    ) -> Result<ModuleSyncResult> {
        let page_size = request.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        let mut pulled: Vec<(ErpResource, Value)> = Vec::new();
        for resource in module.resources() {
            let records = collect_resource(
                self.api.as_ref(),
                &request.token,
                *resource,
                filter,
                page_size,
            )
            .await
            .map_err(ErpError::from)?;
            pulled.extend(records.into_iter().map(|r| (*resource, r)));
        }

        let drafts: Vec<TransactionDraft> = pulled
            .iter()
            .flat_map(|(resource, record)| match module {
                ErpModule::Orders => map_order(record, &request.tenant_id, &self.mapper),
                ErpModule::Invoices => map_invoice(record, &request.tenant_id, &self.mapper),
                ErpModule::Financial => map_financial(
                    record,
                    &request.tenant_id,
                    &self.mapper,
                    resource.financial_kind(),
                ),
            })
            .collect();

        let outcome = self
            .reconciliation
            .reconcile(&request.tenant_id, drafts)
            .await?;

        debug!(
            "synced module {} for tenant {}: {} pulled, {} inserted, {} updated",
            module, request.tenant_id, pulled.len(), outcome.inserted, outcome.updated
        );

        Ok(ModuleSyncResult {
            module,
            pulled: pulled.len(),
            persisted: outcome.inserted,
            updated: outcome.updated,
            error: None,
        })
    }
}

#[async_trait]
impl ErpSyncServiceTrait for ErpSyncService {
    async fn sync(&self, request: SyncRequest) -> Result<Vec<ModuleSyncResult>> {
        if request.token.trim().is_empty() {
            return Err(ErpError::MissingToken(request.tenant_id.clone()).into());
        }

        let modules = if request.modules.is_empty() {
            vec![ErpModule::Orders]
        } else {
            request.modules.clone()
        };

        let filter = SearchFilter {
            updated_from: request.date_from,
            issued_from: request.date_from,
            ..Default::default()
        };

        let mut results = Vec::with_capacity(modules.len());
        for module in modules {
            match self.sync_module(&request, module, &filter).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!(
                        "module {} failed for tenant {}: {}",
                        module, request.tenant_id, e
                    );
                    results.push(ModuleSyncResult {
                        module,
                        pulled: 0,
                        persisted: 0,
                        updated: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        Ok(results)
    }
}
