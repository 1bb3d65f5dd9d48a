//! Apis command - list the APIs a scan would cover

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::error;

use crate::application::audit::{AuditError, AuditService};
use crate::application::whitelist::WhitelistIndex;
use crate::cli::exit_codes;
use crate::config::Config;
use crate::infrastructure::gateway::{AwsGatewayClient, GatewayClient};

/// Arguments for the apis command
#[derive(Args, Debug)]
pub struct ApisArgs {
    /// Include APIs excluded by suffix filters
    #[arg(long)]
    pub all: bool,
}

pub async fn run(config: &Config, args: &ApisArgs) -> Result<i32> {
    let client = Arc::new(AwsGatewayClient::from_env().await);

    let apis = if args.all {
        client.list_rest_apis().await.map_err(AuditError::from)
    } else {
        let service = AuditService::new(
            client.clone(),
            Arc::new(WhitelistIndex::default()),
            &config.scan,
        );
        service.list_target_apis().await
    };

    let apis = match apis {
        Ok(apis) => apis,
        Err(AuditError::Gateway(e)) => {
            error!("gateway error: {e}");
            return Ok(exit_codes::GATEWAY_ERROR);
        }
        Err(e) => return Err(e.into()),
    };

    for api in &apis {
        println!("{}\t{}", api.id, api.name);
    }

    Ok(exit_codes::SUCCESS)
}
