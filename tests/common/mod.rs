//! Shared test doubles for integration tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use gatewatch::domain::entities::{AuthorizerInfo, MethodConfig, Resource, RestApi};
use gatewatch::domain::value_objects::AuthorizationType;
use gatewatch::infrastructure::gateway::{GatewayClient, GatewayError};
use gatewatch::infrastructure::report::{ReportError, ReportSink};

/// Scriptable in-memory gateway
#[derive(Default)]
pub struct FakeGateway {
    apis: Vec<RestApi>,
    resources: HashMap<String, Vec<Resource>>,
    methods: HashMap<(String, String, String), MethodConfig>,
    authorizers: HashMap<String, Vec<AuthorizerInfo>>,
    fail_resources_for: HashSet<String>,
    fail_methods: HashSet<(String, String, String)>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api(mut self, id: &str, name: &str) -> Self {
        self.apis.push(RestApi {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_resource(mut self, api_id: &str, resource_id: &str, path: &str, methods: &[&str]) -> Self {
        self.resources
            .entry(api_id.to_string())
            .or_default()
            .push(Resource {
                id: resource_id.to_string(),
                path: path.to_string(),
                methods: methods.iter().map(|m| m.to_string()).collect(),
            });
        self
    }

    pub fn with_method(
        mut self,
        api_id: &str,
        resource_id: &str,
        method: &str,
        auth: AuthorizationType,
        authorizer_id: Option<&str>,
    ) -> Self {
        self.methods.insert(
            (
                api_id.to_string(),
                resource_id.to_string(),
                method.to_string(),
            ),
            MethodConfig {
                authorization_type: auth,
                authorizer_id: authorizer_id.map(str::to_string),
                api_key_required: false,
                integration_uri: None,
            },
        );
        self
    }

    pub fn with_authorizer(mut self, api_id: &str, id: &str, name: &str) -> Self {
        self.authorizers
            .entry(api_id.to_string())
            .or_default()
            .push(AuthorizerInfo {
                id: id.to_string(),
                authorizer_type: "TOKEN".to_string(),
                name: name.to_string(),
            });
        self
    }

    /// Make get_resources fail for one API
    pub fn failing_resources(mut self, api_id: &str) -> Self {
        self.fail_resources_for.insert(api_id.to_string());
        self
    }

    /// Make get_method fail for one endpoint
    pub fn failing_method(mut self, api_id: &str, resource_id: &str, method: &str) -> Self {
        self.fail_methods.insert((
            api_id.to_string(),
            resource_id.to_string(),
            method.to_string(),
        ));
        self
    }
}

#[async_trait]
impl GatewayClient for FakeGateway {
    async fn list_rest_apis(&self) -> Result<Vec<RestApi>, GatewayError> {
        Ok(self.apis.clone())
    }

    async fn get_resources(&self, api_id: &str) -> Result<Vec<Resource>, GatewayError> {
        if self.fail_resources_for.contains(api_id) {
            return Err(GatewayError::api(format!(
                "simulated resource listing failure for {api_id}"
            )));
        }
        Ok(self.resources.get(api_id).cloned().unwrap_or_default())
    }

    async fn get_method(
        &self,
        api_id: &str,
        resource_id: &str,
        method: &str,
    ) -> Result<MethodConfig, GatewayError> {
        let key = (
            api_id.to_string(),
            resource_id.to_string(),
            method.to_string(),
        );
        if self.fail_methods.contains(&key) {
            return Err(GatewayError::api(format!(
                "simulated method lookup failure for {method}"
            )));
        }
        self.methods
            .get(&key)
            .cloned()
            .ok_or_else(|| GatewayError::api(format!("no scripted method for {method}")))
    }

    async fn list_authorizer_ids(&self, api_id: &str) -> Result<Vec<String>, GatewayError> {
        Ok(self
            .authorizers
            .get(api_id)
            .map(|list| list.iter().map(|a| a.id.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_authorizer(
        &self,
        api_id: &str,
        authorizer_id: &str,
    ) -> Result<AuthorizerInfo, GatewayError> {
        self.authorizers
            .get(api_id)
            .and_then(|list| list.iter().find(|a| a.id == authorizer_id))
            .cloned()
            .ok_or_else(|| GatewayError::api(format!("no scripted authorizer {authorizer_id}")))
    }
}

/// Report sink that collects rows in memory
#[derive(Default)]
pub struct VecSink {
    rows: Mutex<Vec<gatewatch::domain::entities::ReportRow>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<gatewatch::domain::entities::ReportRow> {
        self.rows.lock().unwrap().clone()
    }
}

impl ReportSink for VecSink {
    fn append_rows(
        &mut self,
        rows: &[gatewatch::domain::entities::ReportRow],
    ) -> Result<(), ReportError> {
        self.rows.lock().unwrap().extend_from_slice(rows);
        Ok(())
    }
}
