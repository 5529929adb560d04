//! `kuberef scan`

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use kuberef::config::{Config, ConfigLoader};
use kuberef::graph::ReferenceGraph;
use kuberef::handlers::{HandlerLoader, HandlerRegistry};
use kuberef::report::{self, OutputFormat};
use kuberef::{manifests, resolver};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Folder holding the manifests
    pub folder: PathBuf,

    /// Resolve references on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Extra kind handler file, in addition to `handlerFiles` from the config
    #[arg(long = "handlers", value_name = "FILE")]
    pub handler_files: Vec<PathBuf>,
}

/// Load, resolve and print the reference graph of a folder
pub fn handle_scan_command(args: ScanArgs) -> Result<()> {
    let mut config = ConfigLoader::load().context("Failed to load configuration")?;
    config.handler_files.extend(args.handler_files);
    config.parallel |= args.parallel;

    let registry = build_registry(&config)?;
    let resources = manifests::scan_folder(&args.folder, &config)
        .with_context(|| format!("Failed to scan {}", args.folder.display()))?;

    let resolution = if config.parallel {
        resolver::resolve_parallel_with_report(&registry, &resources)
    } else {
        resolver::resolve_with_report(&registry, &resources)
    };
    tracing::info!(
        "{} edges, {} unresolved",
        resolution.edges.len(),
        resolution.unresolved.len()
    );

    let graph = ReferenceGraph::build(resources, resolution.edges);
    let unresolved = config
        .report_unresolved
        .then_some(resolution.unresolved.as_slice());

    match args.format {
        OutputFormat::Text => print!("{}", report::render_text(&graph, unresolved)),
        OutputFormat::Json => println!(
            "{}",
            report::render_json(&graph, unresolved).context("Failed to serialize report")?
        ),
    }
    Ok(())
}

/// Built-in catalog plus the handler files named in `config`
///
/// File handlers replace built-in ones with the same key.
pub fn build_registry(config: &Config) -> Result<HandlerRegistry> {
    let mut registry =
        HandlerRegistry::builtin().context("Built-in handler catalog is invalid")?;
    for handler in HandlerLoader::load_files(&config.handler_files)? {
        registry.register(handler)?;
    }
    tracing::debug!("Registry holds {} kind handlers", registry.len());
    Ok(registry)
}
