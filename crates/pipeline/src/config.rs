//! Pipeline configuration

use crate::PipelineError;
use ::config::{Config, Environment, File};
use frame_capture::SamplerConfig;
use posture_features::LandmarkName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix, e.g. `POSTURE_FRAME_INTERVAL_SECONDS`
pub const ENV_PREFIX: &str = "POSTURE";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory of stills (extract) or decoded video frames (sample)
    pub input_source: PathBuf,

    /// CSV file (extract) or still directory (sample)
    pub output_destination: PathBuf,

    /// Seconds between sampled stills
    pub frame_interval_seconds: f64,

    /// Declared frame rate of the input frame sequence
    pub source_fps: Option<f64>,

    /// Landmarks that must be present for a frame to be extracted
    pub required_landmarks: Vec<LandmarkName>,

    /// Concurrent extraction workers
    pub workers: usize,

    /// Accepted image file extensions (case-insensitive)
    pub image_extensions: Vec<String>,

    /// Directory holding landmark sidecar files, defaults to the image directory
    pub landmarks_dir: Option<PathBuf>,

    /// Still sampling settings
    pub sampler: SamplerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_source: PathBuf::from("data/dataset_frames/Good"),
            output_destination: PathBuf::from("data/posture_features_good.csv"),
            frame_interval_seconds: 2.0,
            source_fps: None,
            required_landmarks: LandmarkName::REQUIRED.to_vec(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            image_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            landmarks_dir: None,
            sampler: SamplerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, then the optional file, then `POSTURE_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        Self::load_with_env(path, None)
    }

    /// Same as [`PipelineConfig::load`] with an explicit environment map
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<::config::Map<String, String>>,
    ) -> Result<Self, PipelineError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("required_landmarks")
                .with_list_parse_key("image_extensions")
                .source(env),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could succeed with
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.frame_interval_seconds.is_finite() || self.frame_interval_seconds <= 0.0 {
            return Err(PipelineError::Config(format!(
                "frame_interval_seconds must be positive, got {}",
                self.frame_interval_seconds
            )));
        }
        if self.workers == 0 {
            return Err(PipelineError::Config("workers must be at least 1".into()));
        }
        if self.image_extensions.is_empty() {
            return Err(PipelineError::Config(
                "image_extensions must not be empty".into(),
            ));
        }
        if let Some(fps) = self.source_fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(PipelineError::Config(format!(
                    "source_fps must be positive, got {}",
                    fps
                )));
            }
        }
        self.sampler
            .validate()
            .map_err(|e| PipelineError::Config(e.to_string()))
    }
}
