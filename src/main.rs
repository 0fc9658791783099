use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use sysdash::app;
use sysdash::cli::Cli;
use sysdash::core::DashboardError;
use sysdash::utils::{logging, AppConfig, FAREWELL};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(path) = cli.log_file {
        config.log_file = Some(path);
    }

    logging::init(config.log_file.as_deref(), &config.log_filter)?;

    match app::run(&config).await {
        Ok(()) => {
            println!("\n{}", FAREWELL);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            match &e {
                DashboardError::Interrupted(source) => eprintln!("Interrupted by {}", source),
                other => eprintln!("Error: {}", other),
            }
            Ok(ExitCode::from(e.exit_status()))
        }
    }
}
