//! Gatewatch - main entry point

use clap::Parser;

use gatewatch::cli::{commands, exit_codes, Cli, Commands};
use gatewatch::{init_tracing, Config};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        // Only warn if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: failed to load .env file: {}", e);
        }
    }

    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    } else if cli.quiet {
        logging.level = "error".to_string();
    }
    if let Err(e) = init_tracing(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(exit_codes::INTERNAL_ERROR);
    }

    let outcome = match &cli.command {
        Commands::Scan(args) => commands::scan::run(&config, args).await,
        Commands::Apis(args) => commands::apis::run(&config, args).await,
    };

    let code = match outcome {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            exit_codes::INTERNAL_ERROR
        }
    };
    std::process::exit(code);
}
