//! kuberef - resolve references between Kubernetes manifests
//!
//! Scans a folder of manifests, resolves which resources reference which
//! others and prints the resulting graph.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{ConfigSubcommand, ScanArgs};

/// kuberef - resolve references between Kubernetes manifests
#[derive(Parser, Debug)]
#[command(name = "kuberef", version)]
#[command(about = "Resolve references between Kubernetes manifests", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a folder and print its reference graph
    Scan(ScanArgs),
    /// List registered kind handlers
    Handlers {
        /// Also print every rule
        #[arg(long, short = 'v')]
        verbose: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = cli::init_logging(args.debug)?;
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    match args.command {
        Command::Scan(scan) => cli::handle_scan_command(scan),
        Command::Handlers { verbose } => cli::handle_handlers_command(verbose),
        Command::Config { subcommand } => cli::handle_config_command(subcommand),
    }
}
