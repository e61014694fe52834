//! Frame Capture Library
//!
//! Turns a decoded video stream into still images sampled at a fixed
//! time interval:
//! - `VideoFrame` RGB frame type
//! - `FrameSource` trait with a directory-backed image sequence source
//! - `FrameSampler` interval selection and `FrameWriter` JPEG output

pub mod frame;
pub mod sampler;
pub mod source;

pub use frame::VideoFrame;
pub use sampler::{sample_frames, FrameSampler, FrameWriter, SampleReport};
pub use source::{has_image_extension, list_images, FrameSource, ImageSequenceSource};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Capture error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open frame source {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode frame {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to write frame {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Invalid sampler configuration: {0}")]
    InvalidConfig(String),
}

/// Still-frame sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Frame rate assumed when the source does not report a usable one
    pub fallback_fps: u32,
    /// Width of saved stills
    pub output_width: u32,
    /// Height of saved stills
    pub output_height: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Optional subdirectory of the output directory, e.g. "Good"
    pub label: Option<String>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            fallback_fps: 30,
            output_width: 1280,
            output_height: 720,
            jpeg_quality: 85,
            label: None,
        }
    }
}

impl SamplerConfig {
    /// Check ranges before any frame is read
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.fallback_fps == 0 {
            return Err(CaptureError::InvalidConfig(
                "fallback_fps must be at least 1".into(),
            ));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(CaptureError::InvalidConfig(format!(
                "output size {}x{} has a zero dimension",
                self.output_width, self.output_height
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CaptureError::InvalidConfig(format!(
                "jpeg_quality {} is out of range [1, 100]",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
