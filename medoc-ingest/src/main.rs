//! medoc-ingest - title metadata ingest
//!
//! Reads title identifiers, fetches each title's metadata graph, flattens
//! it into a tagged document and stores it. See `medoc-ingest --help`.

use anyhow::{Context, Result};
use clap::Parser;
use medoc_common::config::resolve_root_folder;
use medoc_ingest::cli::{Cli, Command};
use medoc_ingest::logging;
use medoc_ingest::models::facets::selectable_facets;
use medoc_ingest::settings::RunSettings;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = logging::load_config_logged(cli.config.as_deref(), std::io::stdout)
        .context("Failed to load configuration")?;

    // RUST_LOG overrides the configured level
    logging::init(&config.logging.level);

    info!(
        "Starting medoc-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match cli.command {
        Command::Facets => {
            for facet in selectable_facets() {
                println!("{}", facet);
            }
        }
        Command::Run(args) => {
            let root_folder = resolve_root_folder(cli.root_folder.as_deref(), &config);
            let settings = RunSettings::resolve(&args, &root_folder, &config)
                .context("Invalid run configuration")?;

            let report = medoc_ingest::ingest(&settings).await.context("Ingest failed")?;

            info!(
                requested = report.requested,
                persisted = report.persisted,
                dropped = report.dropped,
                "Ingest complete"
            );
            println!(
                "Stored {} of {} titles in {}__{} ({} dropped, see {})",
                report.persisted,
                report.requested,
                settings.sink.namespace,
                settings.sink.collection,
                report.dropped,
                settings.error_log_dir.join(medoc_ingest::error_log::ERROR_LOG_FILE).display()
            );
        }
    }

    Ok(())
}
