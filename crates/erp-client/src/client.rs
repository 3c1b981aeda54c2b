//! The reqwest-backed ERP client and the [`ErpApi`] trait it implements.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ErpClientError;
use crate::payload::{resolve_detail_id, unwrap_collection, unwrap_root};
use crate::resources::{ErpResource, SearchFilter};

const DEFAULT_BASE_URL: &str = "https://api.tiny.com.br/api2/";

/// Detail lookups per page that may be in flight at once.
pub const DETAIL_CONCURRENCY: usize = 8;

/// Transport contract consumed by the sync pipeline.
///
/// `search_page` returns one page of summary records; `fetch_detail`
/// enriches one summary and degrades to the summary itself on any failure,
/// so a detail problem can never abort a sync.
#[async_trait]
pub trait ErpApi: Send + Sync {
    async fn search_page(
        &self,
        token: &str,
        resource: ErpResource,
        filter: &SearchFilter,
        page: u32,
        page_size: usize,
    ) -> Result<Vec<Value>, ErpClientError>;

    async fn fetch_detail(&self, token: &str, resource: ErpResource, summary: &Value) -> Value;
}

/// HTTP client for the Tiny-style ERP API2.
pub struct ErpClient {
    http: Client,
    base_url: String,
}

impl ErpClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self { http, base_url }
    }

    async fn post_form(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ErpClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("ERP request: {} with {} params", endpoint, params.len());

        let response = self
            .http
            .post(&url)
            .form(params)
            .send()
            .await
            .map_err(|e| ErpClientError::Request {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErpClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ErpClientError::InvalidJson {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }

    fn base_params(token: &str) -> Vec<(&'static str, String)> {
        vec![("token", token.to_string()), ("formato", "json".to_string())]
    }
}

impl Default for ErpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ErpApi for ErpClient {
    async fn search_page(
        &self,
        token: &str,
        resource: ErpResource,
        filter: &SearchFilter,
        page: u32,
        page_size: usize,
    ) -> Result<Vec<Value>, ErpClientError> {
        let mut params = Self::base_params(token);
        params.push(("pagina", page.to_string()));
        params.push(("limite", page_size.to_string()));
        params.extend(filter.params(resource));

        let (plural, singular) = resource.collection_keys();

        let response = first_success(resource.search_endpoints(), |endpoint| {
            self.post_form(endpoint, &params)
        })
        .await?;
        let root = unwrap_root(&response);
        Ok(unwrap_collection(root, plural, singular))
    }

    async fn fetch_detail(&self, token: &str, resource: ErpResource, summary: &Value) -> Value {
        let Some(id) = resolve_detail_id(summary, resource.detail_id_keys()) else {
            warn!(
                "no usable identifier on {} summary, keeping it unenriched",
                resource.as_str()
            );
            return summary.clone();
        };

        let mut params = Self::base_params(token);
        params.push(("id", id));

        for endpoint in resource.detail_endpoints() {
            match self.post_form(endpoint, &params).await {
                Ok(response) => {
                    let root = unwrap_root(&response);
                    for container in resource.detail_containers() {
                        if let Some(record) = root.get(container).or_else(|| response.get(container))
                        {
                            return record.clone();
                        }
                    }
                    return summary.clone();
                }
                Err(e) => {
                    warn!("ERP detail via {} failed: {}", endpoint, e);
                }
            }
        }
        summary.clone()
    }
}

/// Runs `attempt` against each endpoint spelling in priority order; the
/// first success wins and the last failure is the one surfaced.
async fn first_success<T, Fut>(
    endpoints: &[&'static str],
    mut attempt: impl FnMut(&'static str) -> Fut,
) -> Result<T, ErpClientError>
where
    Fut: std::future::Future<Output = Result<T, ErpClientError>>,
{
    let mut last_err = None;
    for &endpoint in endpoints {
        match attempt(endpoint).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("ERP call to {} failed, trying fallback: {}", endpoint, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| ErpClientError::Request {
        endpoint: "(none)".to_string(),
        message: "no endpoint spellings configured".to_string(),
    }))
}

/// Walks every page of a resource, enriching each summary with its detail.
///
/// The walk stops when a page comes back empty or short of `page_size`.
/// Detail fetches run [`DETAIL_CONCURRENCY`] at a time per page; result
/// order within a page is not preserved (ordering is not a ledger
/// invariant).
pub async fn collect_resource(
    api: &dyn ErpApi,
    token: &str,
    resource: ErpResource,
    filter: &SearchFilter,
    page_size: usize,
) -> Result<Vec<Value>, ErpClientError> {
    let mut records = Vec::new();
    let mut page: u32 = 1;

    loop {
        let summaries = api
            .search_page(token, resource, filter, page, page_size)
            .await?;
        if summaries.is_empty() {
            break;
        }
        let page_len = summaries.len();

        let details: Vec<Value> = stream::iter(summaries)
            .map(|summary| async move { api.fetch_detail(token, resource, &summary).await })
            .buffer_unordered(DETAIL_CONCURRENCY)
            .collect()
            .await;
        records.extend(details);

        if page_len < page_size {
            break;
        }
        page += 1;
    }

    Ok(records)
}
