//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

// Build timestamp injected at compile time
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Debug, Parser)]
#[command(name = "sysdash")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file (default: ~/.config/sysdash/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file (overrides `log_file` in the config)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
