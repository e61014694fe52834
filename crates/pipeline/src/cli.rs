//! Command-Line Interface

use crate::config::PipelineConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Posture Pipeline - turn video of a person into per-frame posture features
#[derive(Parser, Debug)]
#[command(name = "posture-pipeline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save one still every interval from a decoded frame sequence
    Sample {
        /// Directory of decoded video frames
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory to write stills to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame rate of the input sequence
        #[arg(long)]
        fps: Option<f64>,

        /// Seconds between stills
        #[arg(long)]
        interval: Option<f64>,

        /// Label subdirectory, e.g. Good or Bad
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Compute posture features for a directory of stills
    Extract {
        /// Directory of still images
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// CSV file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding landmark JSON sidecars
        #[arg(long)]
        landmarks_dir: Option<PathBuf>,

        /// Concurrent workers
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut PipelineConfig) {
        match &self.command {
            Commands::Sample {
                input,
                output,
                fps,
                interval,
                label,
            } => {
                if let Some(input) = input {
                    config.input_source = input.clone();
                }
                if let Some(output) = output {
                    config.output_destination = output.clone();
                }
                if let Some(fps) = fps {
                    config.source_fps = Some(*fps);
                }
                if let Some(interval) = interval {
                    config.frame_interval_seconds = *interval;
                }
                if let Some(label) = label {
                    config.sampler.label = Some(label.clone());
                }
            }
            Commands::Extract {
                input,
                output,
                landmarks_dir,
                workers,
            } => {
                if let Some(input) = input {
                    config.input_source = input.clone();
                }
                if let Some(output) = output {
                    config.output_destination = output.clone();
                }
                if let Some(dir) = landmarks_dir {
                    config.landmarks_dir = Some(dir.clone());
                }
                if let Some(workers) = workers {
                    config.workers = *workers;
                }
            }
        }
    }
}
