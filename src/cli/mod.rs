//! gatewatch CLI - gateway authorization auditing from the command line

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gatewatch - authorization audit for API Gateway deployments
#[derive(Parser, Debug)]
#[command(
    name = "gatewatch",
    version,
    about = "Audit API Gateway endpoints for missing or weak authorization",
    long_about = "Gatewatch scans every REST API in the account, classifies each endpoint's \
                  authorization configuration, and writes consolidated CSV compliance reports.\n\n\
                  Endpoints exempted on purpose are declared in per-category whitelist files."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit APIs and write CSV compliance reports
    #[command(visible_alias = "s")]
    Scan(commands::scan::ScanArgs),

    /// List the APIs a scan would cover
    Apis(commands::apis::ApisArgs),
}

/// Exit codes for CI integration
pub mod exit_codes {
    /// Success - no unprotected endpoints found
    pub const SUCCESS: i32 = 0;
    /// Audit completed with unprotected endpoints found
    pub const UNPROTECTED_FOUND: i32 = 1;
    /// Configuration or input error
    pub const CONFIG_ERROR: i32 = 2;
    /// Gateway API error
    pub const GATEWAY_ERROR: i32 = 3;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = 99;
}
