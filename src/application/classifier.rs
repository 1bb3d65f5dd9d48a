//! Endpoint classification
//!
//! Turns one (method, path) endpoint plus its resolved authorizer into a
//! report row. Classification is pure; all lookups happen before it runs.

use std::collections::HashMap;

use crate::application::whitelist::WhitelistIndex;
use crate::domain::entities::{AuthorizerInfo, MethodConfig, ReportRow};

/// Marker emitted when a method references an authorizer id the API's
/// authorizer listing did not contain
pub const UNKNOWN_AUTHORIZER: &str = "UNKNOWN";

/// Build the report row for one endpoint
pub fn classify(
    api_name: &str,
    method: &str,
    path: &str,
    config: &MethodConfig,
    authorizers: &HashMap<String, AuthorizerInfo>,
    whitelist: &WhitelistIndex,
) -> ReportRow {
    let authorizer_name = if config.authorization_type.requires_authorizer() {
        match config
            .authorizer_id
            .as_deref()
            .and_then(|id| authorizers.get(id))
        {
            Some(info) => info.name.clone(),
            // A referenced id the cache never saw is a defect to surface
            None => UNKNOWN_AUTHORIZER.to_string(),
        }
    } else {
        "NONE".to_string()
    };

    let categories = whitelist.categories_for(api_name, method, path);

    ReportRow {
        api: api_name.to_string(),
        method: method.to_string(),
        path: path.to_string(),
        is_authorized: yes_no(config.authorization_type.is_authorized()),
        authorization_type: config.authorization_type.as_str().to_string(),
        specific_auth_type: specific_auth_type(&config.authorization_type.to_string(), &authorizer_name),
        authorizer_name,
        api_key: yes_no(config.api_key_required),
        whitelist: WhitelistIndex::label(&categories),
        endpoint_url: clean_endpoint_url(config.integration_uri.as_deref().unwrap_or("")),
    }
}

fn yes_no(value: bool) -> String {
    if value { "YES" } else { "NO" }.to_string()
}

/// Refine the authorization type using the authorizer's name when it
/// identifies a known audience
fn specific_auth_type(auth_type: &str, authorizer_name: &str) -> String {
    let lower = authorizer_name.to_ascii_lowercase();
    if lower.contains("admin") {
        "ADMIN".to_string()
    } else if lower.contains("customer") {
        "CUSTOMER".to_string()
    } else {
        auth_type.to_string()
    }
}

/// Strip the scheme and host (which may carry stage variables) from an
/// integration URI, keeping only the path.
///
/// `https://${stageVariables.host}/discounts/bo` becomes `/discounts/bo`;
/// a bare path passes through unchanged.
pub fn clean_endpoint_url(url: &str) -> String {
    if url.is_empty() || url.starts_with('/') {
        return url.to_string();
    }

    if let Some((_, after_scheme)) = url.split_once("://") {
        if let Some((_, path)) = after_scheme.split_once('/') {
            return format!("/{path}");
        }
    }
    String::new()
}
