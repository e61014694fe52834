//! Posture Feature Pipeline
//!
//! Wires the stages together: still sampling from decoded video frames,
//! per-image landmark estimation, posture feature extraction and CSV
//! output.

pub mod cli;
pub mod config;
pub mod estimator;
pub mod extract;
pub mod report;
pub mod sample;

pub use crate::config::PipelineConfig;
pub use estimator::{EstimatorError, PoseEstimator, SidecarEstimator};
pub use extract::{process_image, run_extraction};
pub use report::{RunReport, SkipReason, SkippedFrame};
pub use sample::run_sampling;

use frame_capture::CaptureError;
use std::path::PathBuf;
use storage::StorageError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Run-fatal pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No images found in {0}")]
    NoInput(PathBuf),

    #[error("No frames could be read from {0}")]
    NoFrames(PathBuf),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl From<::config::ConfigError> for PipelineError {
    fn from(e: ::config::ConfigError) -> Self {
        PipelineError::Config(e.to_string())
    }
}

/// Initialize logging
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}
