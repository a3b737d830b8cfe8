use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "Lucent",
    version = lucent_core::version(),
    about = "Lucent - click-through, always-on-top overlays on every display",
)]
pub struct Args {
    /// Specify custom configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Show this file in the overlays instead of the configured content
    #[arg(long = "content", value_name = "FILE")]
    pub content_path: Option<PathBuf>,

    /// Use default configuration and ignore config files
    #[arg(long = "defaults", conflicts_with = "config_path")]
    pub use_defaults: bool,

    /// Validate configuration and exit without starting
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Only log info, warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log everything, including trace output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
