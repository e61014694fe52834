//! Fixed-interval still sampling

use crate::source::FrameSource;
use crate::{CaptureError, SamplerConfig, VideoFrame};
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Keeps one frame every `step` frames, starting with the first
#[derive(Debug, Clone)]
pub struct FrameSampler {
    step: u64,
    frame_count: u64,
}

impl FrameSampler {
    /// Create a sampler for a stream at `fps` sampled every `interval_seconds`.
    ///
    /// The frame rate is truncated to whole frames; a missing or sub-1
    /// rate falls back to `fallback_fps`.
    pub fn new(fps: Option<f64>, interval_seconds: f64, fallback_fps: u32) -> Result<Self, CaptureError> {
        if !interval_seconds.is_finite() || interval_seconds <= 0.0 {
            return Err(CaptureError::InvalidConfig(format!(
                "frame interval {} must be a positive number of seconds",
                interval_seconds
            )));
        }

        let whole_fps = match fps.map(f64::trunc) {
            Some(f) if f.is_finite() && f >= 1.0 => f,
            _ => f64::from(fallback_fps.max(1)),
        };
        let step = (whole_fps * interval_seconds).round().max(1.0) as u64;

        debug!("Sampling every {} frames ({} fps, {}s)", step, whole_fps, interval_seconds);

        Ok(Self {
            step,
            frame_count: 0,
        })
    }

    /// Frames between kept stills
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Advance by one frame, returning whether it should be kept
    pub fn tick(&mut self) -> bool {
        let keep = self.frame_count % self.step == 0;
        self.frame_count += 1;
        keep
    }
}

/// Writes sampled stills as sequentially numbered JPEG files
pub struct FrameWriter {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    quality: u8,
    saved: usize,
}

impl FrameWriter {
    /// Create the output directory (plus the label subdirectory, if any)
    pub fn create(output_dir: &Path, config: &SamplerConfig) -> Result<Self, CaptureError> {
        config.validate()?;

        let output_dir = match &config.label {
            Some(label) => output_dir.join(label),
            None => output_dir.to_path_buf(),
        };
        std::fs::create_dir_all(&output_dir).map_err(|e| CaptureError::Write {
            path: output_dir.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            output_dir,
            width: config.output_width,
            height: config.output_height,
            quality: config.jpeg_quality,
            saved: 0,
        })
    }

    /// Directory stills are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of stills written so far
    pub fn saved(&self) -> usize {
        self.saved
    }

    /// Resize and save a frame as `frame_NNN.jpg`
    pub fn write(&mut self, frame: &VideoFrame) -> Result<PathBuf, CaptureError> {
        let path = self.output_dir.join(format!("frame_{:03}.jpg", self.saved));
        let write_err = |message: String| CaptureError::Write {
            path: path.clone(),
            message,
        };

        let image = frame
            .resized(self.width, self.height)
            .ok_or_else(|| write_err("frame data does not match its dimensions".into()))?;

        let file = File::create(&path).map_err(|e| write_err(e.to_string()))?;
        let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), self.quality);
        encoder
            .encode_image(&image)
            .map_err(|e| write_err(e.to_string()))?;

        self.saved += 1;
        Ok(path)
    }
}

/// Outcome of a sampling run
#[derive(Debug, Clone, Default)]
pub struct SampleReport {
    /// Frames pulled from the source
    pub frames_read: usize,
    /// Frames that failed to decode
    pub frames_failed: usize,
    /// Stills written
    pub frames_saved: usize,
    /// Directory the stills went to
    pub output_dir: PathBuf,
}

/// Pull every frame from `source` and save one still per interval
pub fn sample_frames<S>(
    source: &mut S,
    interval_seconds: f64,
    config: &SamplerConfig,
    output_dir: &Path,
) -> Result<SampleReport, CaptureError>
where
    S: FrameSource + ?Sized,
{
    let mut sampler = FrameSampler::new(source.fps(), interval_seconds, config.fallback_fps)?;
    let mut writer = FrameWriter::create(output_dir, config)?;

    info!(
        "Sampling frames every {}s (step {}) into {}",
        interval_seconds,
        sampler.step(),
        writer.output_dir().display()
    );

    let mut report = SampleReport {
        output_dir: writer.output_dir().to_path_buf(),
        ..Default::default()
    };

    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(CaptureError::Decode { path, message }) => {
                warn!("Skipped undecodable frame {}: {}", path.display(), message);
                report.frames_read += 1;
                report.frames_failed += 1;
                sampler.tick();
                continue;
            }
            Err(e) => return Err(e),
        };
        report.frames_read += 1;

        if sampler.tick() {
            let path = writer.write(&frame)?;
            debug!("Saved frame {} to {}", frame.sequence, path.display());
        }
    }

    report.frames_saved = writer.saved();
    info!(
        "Extracted {} of {} frames into {}",
        report.frames_saved,
        report.frames_read,
        report.output_dir.display()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// In-memory source of solid-colour frames
    struct SyntheticSource {
        fps: Option<f64>,
        remaining: u32,
        sequence: u32,
    }

    impl FrameSource for SyntheticSource {
        fn fps(&self) -> Option<f64> {
            self.fps
        }

        fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            let seq = self.sequence;
            self.sequence += 1;
            Ok(Some(VideoFrame::new(vec![128; 8 * 6 * 3], 8, 6, 0, seq)))
        }
    }

    fn small_output() -> SamplerConfig {
        SamplerConfig {
            output_width: 16,
            output_height: 9,
            ..Default::default()
        }
    }

    #[test]
    fn test_step_from_fps_and_interval() {
        assert_eq!(FrameSampler::new(Some(30.0), 2.0, 30).unwrap().step(), 60);
        assert_eq!(FrameSampler::new(Some(29.97), 2.0, 30).unwrap().step(), 58);
        assert_eq!(FrameSampler::new(Some(25.0), 0.5, 30).unwrap().step(), 13);
        assert_eq!(FrameSampler::new(Some(30.0), 0.001, 30).unwrap().step(), 1);
    }

    #[test]
    fn test_missing_fps_uses_fallback() {
        assert_eq!(FrameSampler::new(None, 2.0, 30).unwrap().step(), 60);
        assert_eq!(FrameSampler::new(Some(0.0), 1.0, 24).unwrap().step(), 24);
        assert_eq!(FrameSampler::new(Some(f64::NAN), 1.0, 24).unwrap().step(), 24);
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        assert!(FrameSampler::new(Some(30.0), 0.0, 30).is_err());
        assert!(FrameSampler::new(Some(30.0), -1.0, 30).is_err());
        assert!(FrameSampler::new(Some(30.0), f64::INFINITY, 30).is_err());
    }

    #[test]
    fn test_tick_keeps_first_of_each_step() {
        let mut sampler = FrameSampler::new(Some(2.0), 1.5, 30).unwrap();
        assert_eq!(sampler.step(), 3);
        let kept: Vec<bool> = (0..7).map(|_| sampler.tick()).collect();
        assert_eq!(kept, vec![true, false, false, true, false, false, true]);
    }

    #[test]
    fn test_sample_frames_writes_numbered_stills() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = SyntheticSource {
            fps: Some(5.0),
            remaining: 23,
            sequence: 0,
        };
        let config = SamplerConfig {
            label: Some("Good".into()),
            ..small_output()
        };

        let report = sample_frames(&mut source, 2.0, &config, dir.path()).unwrap();

        // step 10: frames 0, 10, 20
        assert_eq!(report.frames_read, 23);
        assert_eq!(report.frames_saved, 3);
        assert_eq!(report.output_dir, dir.path().join("Good"));
        for i in 0..3 {
            let path = dir.path().join("Good").join(format!("frame_{:03}.jpg", i));
            assert_eq!(image::image_dimensions(&path).unwrap(), (16, 9));
        }
        assert!(!dir.path().join("Good").join("frame_003.jpg").exists());
    }

    #[test]
    fn test_empty_source_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = SyntheticSource {
            fps: None,
            remaining: 0,
            sequence: 0,
        };
        let report = sample_frames(&mut source, 2.0, &small_output(), dir.path()).unwrap();
        assert_eq!(report.frames_read, 0);
        assert_eq!(report.frames_saved, 0);
    }

    proptest! {
        #[test]
        fn prop_saved_count_matches_step(frames in 0u32..200, fps in 1u32..60, interval in 1u32..5) {
            let mut sampler = FrameSampler::new(Some(f64::from(fps)), f64::from(interval), 30).unwrap();
            let step = sampler.step();
            let kept = (0..frames).filter(|_| sampler.tick()).count() as u64;
            prop_assert_eq!(kept, (u64::from(frames) + step - 1) / step);
        }
    }
}
