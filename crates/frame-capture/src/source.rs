//! Frame sources

use crate::{CaptureError, VideoFrame};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A stream of decoded frames
pub trait FrameSource {
    /// Native frame rate, if known
    fn fps(&self) -> Option<f64>;

    /// Next frame, `Ok(None)` at end of stream
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError>;
}

/// Case-insensitive extension check, e.g. `frame.JPG` matches `jpg`
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Regular files in `dir` with an accepted extension, sorted by path
pub fn list_images(dir: &Path, extensions: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path, extensions) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// A directory of already-decoded frames played back as a video.
///
/// Files are ordered by name; timestamps derive from the index and the
/// declared frame rate.
pub struct ImageSequenceSource {
    files: Vec<PathBuf>,
    position: usize,
    fps: Option<f64>,
}

impl ImageSequenceSource {
    /// List the frames of `dir` whose extension is in `extensions`
    pub fn open(dir: &Path, fps: Option<f64>, extensions: &[String]) -> Result<Self, CaptureError> {
        let files = list_images(dir, extensions).map_err(|source| CaptureError::Open {
            path: dir.to_path_buf(),
            source,
        })?;

        info!("Opened image sequence {} ({} frames)", dir.display(), files.len());

        Ok(Self {
            files,
            position: 0,
            fps,
        })
    }

    /// Total number of frames
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the sequence has no frames
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn timestamp_ns(&self, sequence: usize) -> u64 {
        match self.fps {
            Some(fps) if fps > 0.0 => (sequence as f64 * 1e9 / fps) as u64,
            _ => 0,
        }
    }
}

impl FrameSource for ImageSequenceSource {
    fn fps(&self) -> Option<f64> {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        let Some(path) = self.files.get(self.position) else {
            return Ok(None);
        };
        // A corrupt frame still consumes its slot in the stream
        let sequence = self.position;
        self.position += 1;

        let image = image::open(path).map_err(|e| CaptureError::Decode {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!("Decoded frame {} from {}", sequence, path.display());

        Ok(Some(VideoFrame::from_rgb_image(
            image.to_rgb8(),
            self.timestamp_ns(sequence),
            sequence as u32,
        )))
    }
}
