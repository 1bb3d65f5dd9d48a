//! Audit orchestration
//!
//! APIs are audited sequentially; within one API, resources are analyzed in
//! parallel under a bounded worker pool. Rows reach the report sink as each
//! API completes, so a run that dies partway still leaves a usable partial
//! report.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::application::classifier;
use crate::application::whitelist::WhitelistIndex;
use crate::config::ScanConfig;
use crate::domain::entities::{ApiAuditResult, AuthorizerInfo, ReportRow, Resource, RestApi};
use crate::infrastructure::gateway::{GatewayClient, GatewayError};
use crate::infrastructure::report::{ReportError, ReportSink};

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("no auditable API named '{name}'")]
    ApiNotFound { name: String },

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to acquire worker permit: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),
}

/// Rows and bookkeeping produced by analyzing one resource
struct ResourceOutcome {
    rows: Vec<ReportRow>,
    endpoint_errors: Vec<String>,
    methods_filtered: usize,
}

/// Drives a full authorization audit against a gateway
pub struct AuditService {
    client: Arc<dyn GatewayClient>,
    whitelist: Arc<WhitelistIndex>,
    pool_size: usize,
    excluded_api_suffixes: Vec<String>,
    excluded_methods: Arc<Vec<String>>,
}

impl AuditService {
    pub fn new(
        client: Arc<dyn GatewayClient>,
        whitelist: Arc<WhitelistIndex>,
        scan: &ScanConfig,
    ) -> Self {
        Self {
            client,
            whitelist,
            pool_size: scan.pool_size,
            excluded_api_suffixes: scan.excluded_api_suffixes.clone(),
            excluded_methods: Arc::new(scan.excluded_methods.clone()),
        }
    }

    /// List the APIs this audit will cover, with excluded suffixes removed
    pub async fn list_target_apis(&self) -> Result<Vec<RestApi>, AuditError> {
        let apis = self.client.list_rest_apis().await?;
        let total = apis.len();
        let filtered: Vec<RestApi> = apis
            .into_iter()
            .filter(|api| {
                !self
                    .excluded_api_suffixes
                    .iter()
                    .any(|suffix| api.name.ends_with(suffix))
            })
            .collect();
        info!(
            total,
            auditable = filtered.len(),
            "listed REST APIs"
        );
        Ok(filtered)
    }

    /// Audit every auditable API, appending rows to the sink as each API
    /// completes. An API whose audit fails is recorded as failed and does not
    /// stop the run; report write failures do.
    pub async fn audit_all(
        &self,
        sink: &mut dyn ReportSink,
    ) -> Result<Vec<ApiAuditResult>, AuditError> {
        let apis = self.list_target_apis().await?;
        self.audit_apis(&apis, sink).await
    }

    /// Audit a single API selected by name
    pub async fn audit_one(
        &self,
        name: &str,
        sink: &mut dyn ReportSink,
    ) -> Result<Vec<ApiAuditResult>, AuditError> {
        let apis = self.list_target_apis().await?;
        let target = apis
            .into_iter()
            .find(|api| api.name == name)
            .ok_or_else(|| AuditError::ApiNotFound {
                name: name.to_string(),
            })?;
        self.audit_apis(std::slice::from_ref(&target), sink).await
    }

    async fn audit_apis(
        &self,
        apis: &[RestApi],
        sink: &mut dyn ReportSink,
    ) -> Result<Vec<ApiAuditResult>, AuditError> {
        let mut results = Vec::with_capacity(apis.len());
        for api in apis {
            info!(api = %api.name, id = %api.id, "auditing API");
            match self.audit_api(api, sink).await {
                Ok(result) => {
                    info!(
                        api = %api.name,
                        protected = result.protected,
                        unprotected = result.unprotected,
                        "API audit complete"
                    );
                    results.push(result);
                }
                // An API-level gateway failure is isolated; remaining APIs
                // still run
                Err(AuditError::Gateway(e)) => {
                    error!(api = %api.name, error = %e, "API audit failed");
                    results.push(ApiAuditResult::failed(api, e.to_string()));
                }
                Err(other) => return Err(other),
            }
        }
        Ok(results)
    }

    async fn audit_api(
        &self,
        api: &RestApi,
        sink: &mut dyn ReportSink,
    ) -> Result<ApiAuditResult, AuditError> {
        let authorizers = Arc::new(self.build_authorizer_cache(&api.id).await?);
        let resources = self.client.get_resources(&api.id).await?;

        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.pool_size));
        let mut join_set: JoinSet<Result<ResourceOutcome, AuditError>> = JoinSet::new();

        for resource in &resources {
            if resource.methods.is_empty() {
                continue;
            }
            let permit = Arc::clone(&semaphore);
            let client = Arc::clone(&self.client);
            let whitelist = Arc::clone(&self.whitelist);
            let authorizers = Arc::clone(&authorizers);
            let excluded_methods = Arc::clone(&self.excluded_methods);
            let api_id = api.id.clone();
            let api_name = api.name.clone();
            let resource = resource.clone();

            join_set.spawn(async move {
                let _permit = permit.acquire().await?;
                Ok(analyze_resource(
                    client.as_ref(),
                    &api_id,
                    &api_name,
                    &resource,
                    &authorizers,
                    &whitelist,
                    &excluded_methods,
                )
                .await)
            });
        }

        let mut result = ApiAuditResult {
            api_id: api.id.clone(),
            api_name: api.name.clone(),
            total_resources: resources.len(),
            ..ApiAuditResult::default()
        };

        while let Some(joined) = join_set.join_next().await {
            let outcome = joined??;
            result.methods_filtered += outcome.methods_filtered;
            for message in &outcome.endpoint_errors {
                warn!(api = %api.name, "{message}");
            }
            result.endpoint_errors.extend(outcome.endpoint_errors);
            for row in &outcome.rows {
                if row.is_authorized == "YES" {
                    result.protected += 1;
                } else {
                    result.unprotected += 1;
                }
            }
            sink.append_rows(&outcome.rows)?;
        }

        Ok(result)
    }

    /// Fetch every authorizer of an API once, up front. A detail fetch that
    /// fails leaves a hole in the cache; affected rows report the authorizer
    /// as UNKNOWN instead of failing the API.
    async fn build_authorizer_cache(
        &self,
        api_id: &str,
    ) -> Result<HashMap<String, AuthorizerInfo>, AuditError> {
        let ids = self.client.list_authorizer_ids(api_id).await?;

        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.pool_size));
        let mut join_set: JoinSet<Result<Option<AuthorizerInfo>, AuditError>> = JoinSet::new();

        for id in ids {
            let permit = Arc::clone(&semaphore);
            let client = Arc::clone(&self.client);
            let api_id = api_id.to_string();

            join_set.spawn(async move {
                let _permit = permit.acquire().await?;
                match client.get_authorizer(&api_id, &id).await {
                    Ok(info) => Ok(Some(info)),
                    Err(e) => {
                        warn!(authorizer = %id, error = %e, "authorizer detail fetch failed");
                        Ok(None)
                    }
                }
            });
        }

        let mut cache = HashMap::new();
        while let Some(joined) = join_set.join_next().await {
            if let Some(info) = joined?? {
                cache.insert(info.id.clone(), info);
            }
        }

        debug!(api_id, authorizers = cache.len(), "built authorizer cache");
        Ok(cache)
    }
}

/// Analyze every non-excluded method of one resource.
///
/// Endpoint analysis is all-or-nothing: a method whose lookup fails is
/// recorded as an endpoint error and produces no row.
async fn analyze_resource(
    client: &dyn GatewayClient,
    api_id: &str,
    api_name: &str,
    resource: &Resource,
    authorizers: &HashMap<String, AuthorizerInfo>,
    whitelist: &WhitelistIndex,
    excluded_methods: &[String],
) -> ResourceOutcome {
    let mut outcome = ResourceOutcome {
        rows: Vec::new(),
        endpoint_errors: Vec::new(),
        methods_filtered: 0,
    };

    for method in &resource.methods {
        if excluded_methods.iter().any(|m| m == method) {
            outcome.methods_filtered += 1;
            continue;
        }

        match client.get_method(api_id, &resource.id, method).await {
            Ok(config) => {
                outcome.rows.push(classifier::classify(
                    api_name,
                    method,
                    &resource.path,
                    &config,
                    authorizers,
                    whitelist,
                ));
            }
            Err(e) => {
                outcome
                    .endpoint_errors
                    .push(format!("{method} {}: {e}", resource.path));
            }
        }
    }

    outcome
}
