//! Scan command - run the authorization audit and write reports

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::{error, info, warn};

use crate::application::audit::{AuditError, AuditService};
use crate::application::whitelist::WhitelistIndex;
use crate::cli::exit_codes;
use crate::config::{Config, Validate};
use crate::infrastructure::gateway::AwsGatewayClient;
use crate::infrastructure::report::{self, CsvReportWriter};

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Audit only the API with this exact name
    #[arg(long)]
    pub api: Option<String>,

    /// Override the configured worker pool size
    #[arg(long)]
    pub pool_size: Option<usize>,

    /// Skip writing the per-API summary report
    #[arg(long)]
    pub no_summary: bool,
}

pub async fn run(config: &Config, args: &ScanArgs) -> Result<i32> {
    let mut scan = config.scan.clone();
    if let Some(pool_size) = args.pool_size {
        scan.pool_size = pool_size;
        if let Err(e) = scan.validate() {
            error!("invalid --pool-size: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    }

    let whitelist = WhitelistIndex::load(&config.whitelist);
    if whitelist.is_empty() {
        warn!("no whitelist entries loaded; every unauthorized endpoint will be flagged");
    }

    let client = Arc::new(AwsGatewayClient::from_env().await);
    let service = AuditService::new(client, Arc::new(whitelist), &scan);

    let mut writer = CsvReportWriter::create(&config.report.output_dir, args.api.as_deref())?;
    info!(report = %writer.path().display(), "writing consolidated report");

    let outcome = match &args.api {
        Some(name) => service.audit_one(name, &mut writer).await,
        None => service.audit_all(&mut writer).await,
    };

    let results = match outcome {
        Ok(results) => results,
        Err(AuditError::ApiNotFound { name }) => {
            error!("no auditable API named '{name}'");
            return Ok(exit_codes::CONFIG_ERROR);
        }
        Err(AuditError::Gateway(e)) => {
            error!("gateway error: {e}");
            return Ok(exit_codes::GATEWAY_ERROR);
        }
        Err(e) => return Err(e.into()),
    };

    if !args.no_summary {
        let summary_path = report::write_summary(&config.report.output_dir, &results)?;
        info!(summary = %summary_path.display(), "wrote API summary report");
    }

    let protected: usize = results.iter().map(|r| r.protected).sum();
    let unprotected: usize = results.iter().map(|r| r.unprotected).sum();
    let filtered: usize = results.iter().map(|r| r.methods_filtered).sum();
    let endpoint_errors: usize = results.iter().map(|r| r.endpoint_errors.len()).sum();
    let failed_apis = results.iter().filter(|r| r.error.is_some()).count();

    info!(
        apis = results.len(),
        protected,
        unprotected,
        methods_filtered = filtered,
        endpoint_errors,
        failed_apis,
        "audit complete"
    );

    if unprotected > 0 {
        Ok(exit_codes::UNPROTECTED_FOUND)
    } else if failed_apis > 0 {
        Ok(exit_codes::GATEWAY_ERROR)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}
