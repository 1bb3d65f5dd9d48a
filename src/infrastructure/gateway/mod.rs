//! Gateway control-plane access
//!
//! The audit pipeline talks to the gateway exclusively through
//! [`GatewayClient`], so tests can script responses without network access.

pub mod aws;

pub use aws::AwsGatewayClient;

use async_trait::async_trait;

use crate::domain::entities::{AuthorizerInfo, MethodConfig, Resource, RestApi};

/// Errors from gateway control-plane calls
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway call failed: {message}")]
    Api { message: String },
}

impl GatewayError {
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }
}

/// Read-only view of the gateway's configuration
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// All REST APIs in the account, unfiltered
    async fn list_rest_apis(&self) -> Result<Vec<RestApi>, GatewayError>;

    /// All resources of one API, with their configured HTTP methods
    async fn get_resources(&self, api_id: &str) -> Result<Vec<Resource>, GatewayError>;

    /// Authorization settings of one method on one resource
    async fn get_method(
        &self,
        api_id: &str,
        resource_id: &str,
        method: &str,
    ) -> Result<MethodConfig, GatewayError>;

    /// Ids of every authorizer registered to one API
    async fn list_authorizer_ids(&self, api_id: &str) -> Result<Vec<String>, GatewayError>;

    /// Full details of one authorizer
    async fn get_authorizer(
        &self,
        api_id: &str,
        authorizer_id: &str,
    ) -> Result<AuthorizerInfo, GatewayError>;
}
