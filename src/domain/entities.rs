//! Gateway audit domain entities

use serde::Serialize;

use super::value_objects::AuthorizationType;

/// A REST API as listed by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestApi {
    pub id: String,
    pub name: String,
}

/// A path-level node in the gateway's route tree
#[derive(Debug, Clone)]
pub struct Resource {
    pub id: String,
    pub path: String,
    /// HTTP method names configured on this resource
    pub methods: Vec<String>,
}

/// Authorization settings of one HTTP method on one resource
#[derive(Debug, Clone)]
pub struct MethodConfig {
    pub authorization_type: AuthorizationType,
    pub authorizer_id: Option<String>,
    pub api_key_required: bool,
    /// Backend integration URI, if the method has an integration
    pub integration_uri: Option<String>,
}

/// An authorizer registered to an API, cached for that API's analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizerInfo {
    pub id: String,
    pub authorizer_type: String,
    pub name: String,
}

/// One CSV report row per audited (method, path) endpoint.
///
/// Field order is the report column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub api: String,
    pub method: String,
    pub path: String,
    pub is_authorized: String,
    pub authorization_type: String,
    pub specific_auth_type: String,
    pub authorizer_name: String,
    pub api_key: String,
    pub whitelist: String,
    pub endpoint_url: String,
}

/// Outcome of auditing one API
#[derive(Debug, Clone, Default)]
pub struct ApiAuditResult {
    pub api_id: String,
    pub api_name: String,
    pub total_resources: usize,
    /// Endpoints with proper gateway-level authorization
    pub protected: usize,
    /// Endpoints with authorization type NONE
    pub unprotected: usize,
    /// OPTIONS (or otherwise excluded) methods skipped before classification
    pub methods_filtered: usize,
    /// Endpoints dropped because their lookups failed; never emitted as rows
    pub endpoint_errors: Vec<String>,
    /// Set when the API could not be audited at all
    pub error: Option<String>,
}

impl ApiAuditResult {
    pub fn failed(api: &RestApi, error: impl Into<String>) -> Self {
        Self {
            api_id: api.id.clone(),
            api_name: api.name.clone(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn total_endpoints(&self) -> usize {
        self.protected + self.unprotected
    }
}
