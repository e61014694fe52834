//! Still sampling from a decoded frame sequence

use crate::config::PipelineConfig;
use crate::PipelineError;
use frame_capture::{sample_frames, ImageSequenceSource, SampleReport};
use tracing::info;

/// Sample stills from `config.input_source` into `config.output_destination`.
///
/// Fails when the sequence is empty or none of its frames decode.
pub fn run_sampling(config: &PipelineConfig) -> Result<SampleReport, PipelineError> {
    config.validate()?;

    let mut source = ImageSequenceSource::open(
        &config.input_source,
        config.source_fps,
        &config.image_extensions,
    )?;
    if source.is_empty() {
        return Err(PipelineError::NoFrames(config.input_source.clone()));
    }

    info!(
        "Sampling {} frames from {} (fps: {})",
        source.len(),
        config.input_source.display(),
        config
            .source_fps
            .map(|fps| fps.to_string())
            .unwrap_or_else(|| format!("unknown, assuming {}", config.sampler.fallback_fps))
    );

    let report = sample_frames(
        &mut source,
        config.frame_interval_seconds,
        &config.sampler,
        &config.output_destination,
    )?;

    if report.frames_failed == report.frames_read {
        return Err(PipelineError::NoFrames(config.input_source.clone()));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_capture::SamplerConfig;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn write_frames(dir: &Path, count: usize) {
        for i in 0..count {
            let shade = (i * 10 % 256) as u8;
            RgbImage::from_pixel(32, 18, Rgb([shade, shade, shade]))
                .save(dir.join(format!("decoded_{:04}.png", i)))
                .unwrap();
        }
    }

    fn sampling_config(input: &Path, output: &Path) -> PipelineConfig {
        PipelineConfig {
            input_source: input.to_path_buf(),
            output_destination: output.to_path_buf(),
            frame_interval_seconds: 2.0,
            source_fps: Some(3.0),
            sampler: SamplerConfig {
                output_width: 64,
                output_height: 36,
                label: Some("Good".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_sampling_every_interval() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_frames(input.path(), 14);

        let report = run_sampling(&sampling_config(input.path(), output.path())).unwrap();

        // step 6: frames 0, 6, 12
        assert_eq!(report.frames_read, 14);
        assert_eq!(report.frames_saved, 3);
        let saved = output.path().join("Good").join("frame_002.jpg");
        assert_eq!(image::image_dimensions(saved).unwrap(), (64, 36));
    }

    #[test]
    fn test_empty_sequence_is_fatal() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let result = run_sampling(&sampling_config(input.path(), output.path()));
        assert!(matches!(result, Err(PipelineError::NoFrames(_))));
    }

    #[test]
    fn test_undecodable_sequence_is_fatal() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("decoded_0000.jpg"), b"junk").unwrap();

        let result = run_sampling(&sampling_config(input.path(), output.path()));
        assert!(matches!(result, Err(PipelineError::NoFrames(_))));
    }
}
