//! AWS API Gateway client
//!
//! Thin adapter from the AWS SDK to [`GatewayClient`]. Listing calls follow
//! the position token until the gateway stops returning one.

use async_trait::async_trait;
use aws_sdk_apigateway::Client;
use tracing::debug;

use super::{GatewayClient, GatewayError};
use crate::domain::entities::{AuthorizerInfo, MethodConfig, Resource, RestApi};
use crate::domain::value_objects::AuthorizationType;

const PAGE_SIZE: i32 = 500;

pub struct AwsGatewayClient {
    client: Client,
}

impl AwsGatewayClient {
    /// Build a client from the ambient AWS environment (profile, region,
    /// credentials chain)
    pub async fn from_env() -> Self {
        let sdk_config =
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .load()
                .await;
        Self {
            client: Client::new(&sdk_config),
        }
    }

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn api_error(context: &str, error: impl std::fmt::Display) -> GatewayError {
    GatewayError::api(format!("{context}: {error}"))
}

#[async_trait]
impl GatewayClient for AwsGatewayClient {
    async fn list_rest_apis(&self) -> Result<Vec<RestApi>, GatewayError> {
        let mut apis = Vec::new();
        let mut position: Option<String> = None;

        loop {
            let page = self
                .client
                .get_rest_apis()
                .limit(PAGE_SIZE)
                .set_position(position.take())
                .send()
                .await
                .map_err(|e| api_error("failed to list REST APIs", e))?;

            for item in page.items() {
                let (Some(id), Some(name)) = (item.id(), item.name()) else {
                    continue;
                };
                apis.push(RestApi {
                    id: id.to_string(),
                    name: name.to_string(),
                });
            }

            position = page.position().map(str::to_string);
            if position.is_none() {
                break;
            }
        }

        debug!(count = apis.len(), "listed REST APIs");
        Ok(apis)
    }

    async fn get_resources(&self, api_id: &str) -> Result<Vec<Resource>, GatewayError> {
        let mut resources = Vec::new();
        let mut position: Option<String> = None;

        loop {
            let page = self
                .client
                .get_resources()
                .rest_api_id(api_id)
                .limit(PAGE_SIZE)
                .embed("methods")
                .set_position(position.take())
                .send()
                .await
                .map_err(|e| api_error("failed to list resources", e))?;

            for item in page.items() {
                let (Some(id), Some(path)) = (item.id(), item.path()) else {
                    continue;
                };
                let methods = item
                    .resource_methods()
                    .map(|m| m.keys().cloned().collect())
                    .unwrap_or_default();
                resources.push(Resource {
                    id: id.to_string(),
                    path: path.to_string(),
                    methods,
                });
            }

            position = page.position().map(str::to_string);
            if position.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn get_method(
        &self,
        api_id: &str,
        resource_id: &str,
        method: &str,
    ) -> Result<MethodConfig, GatewayError> {
        let output = self
            .client
            .get_method()
            .rest_api_id(api_id)
            .resource_id(resource_id)
            .http_method(method)
            .send()
            .await
            .map_err(|e| api_error("failed to get method", e))?;

        Ok(MethodConfig {
            authorization_type: AuthorizationType::from_raw(
                output.authorization_type().unwrap_or(""),
            ),
            authorizer_id: output.authorizer_id().map(str::to_string),
            api_key_required: output.api_key_required().unwrap_or(false),
            integration_uri: output
                .method_integration()
                .and_then(|i| i.uri())
                .map(str::to_string),
        })
    }

    async fn list_authorizer_ids(&self, api_id: &str) -> Result<Vec<String>, GatewayError> {
        let mut ids = Vec::new();
        let mut position: Option<String> = None;

        loop {
            let page = self
                .client
                .get_authorizers()
                .rest_api_id(api_id)
                .limit(PAGE_SIZE)
                .set_position(position.take())
                .send()
                .await
                .map_err(|e| api_error("failed to list authorizers", e))?;

            ids.extend(page.items().iter().filter_map(|a| a.id()).map(str::to_string));

            position = page.position().map(str::to_string);
            if position.is_none() {
                break;
            }
        }

        Ok(ids)
    }

    async fn get_authorizer(
        &self,
        api_id: &str,
        authorizer_id: &str,
    ) -> Result<AuthorizerInfo, GatewayError> {
        let output = self
            .client
            .get_authorizer()
            .rest_api_id(api_id)
            .authorizer_id(authorizer_id)
            .send()
            .await
            .map_err(|e| api_error("failed to get authorizer", e))?;

        Ok(AuthorizerInfo {
            id: output.id().unwrap_or(authorizer_id).to_string(),
            authorizer_type: output
                .r#type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            name: output.name().unwrap_or_default().to_string(),
        })
    }
}
