//! Posture Pipeline - Main Entry Point

use anyhow::Context;
use clap::Parser;
use pipeline::cli::{Cli, Commands};
use pipeline::{init_logging, run_extraction, run_sampling, PipelineConfig, SidecarEstimator};
use std::sync::Arc;
use storage::CsvSink;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("=== Posture Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    match cli.command {
        Commands::Sample { .. } => {
            let report = tokio::task::spawn_blocking(move || run_sampling(&config))
                .await
                .context("sampling task panicked")??;
            info!(
                "Done! Extracted {} of {} frames into {}",
                report.frames_saved,
                report.frames_read,
                report.output_dir.display()
            );
        }
        Commands::Extract { .. } => {
            let mut sink = CsvSink::create(&config.output_destination)?;
            let estimator = Arc::new(SidecarEstimator::new(config.landmarks_dir.clone()));
            let report = run_extraction(&config, estimator, &mut sink).await?;
            info!("{} and saved to {}", report, sink.path().display());
        }
    }

    Ok(())
}
