//! Concurrent feature extraction over a directory of stills

use crate::config::PipelineConfig;
use crate::estimator::PoseEstimator;
use crate::report::{RunReport, SkipReason, SkippedFrame};
use crate::PipelineError;
use posture_features::{FeatureError, FeatureVector, LandmarkName, PostureFeatureExtractor};
use std::path::Path;
use std::sync::Arc;
use storage::{FeatureRow, FeatureSink};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Run one image through decode check, estimation and extraction
pub fn process_image<E>(
    image: &Path,
    estimator: &E,
    required: &[LandmarkName],
) -> Result<FeatureVector, SkipReason>
where
    E: PoseEstimator + ?Sized,
{
    image::image_dimensions(image).map_err(|e| SkipReason::Unreadable(e.to_string()))?;

    let landmarks = estimator
        .estimate(image)
        .map_err(|e| SkipReason::EstimatorFailed(e.to_string()))?
        .ok_or(SkipReason::NoDetection)?;

    if let Some(name) = landmarks.missing(required).into_iter().next() {
        return Err(SkipReason::MissingLandmark(name));
    }

    PostureFeatureExtractor::new()
        .extract(&landmarks)
        .map_err(|FeatureError::MissingLandmark { name }| SkipReason::MissingLandmark(name))
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extract features for every image in `config.input_source`.
///
/// Images are processed on the blocking pool, at most `config.workers` at
/// a time. Rows reach the sink sorted by filename regardless of
/// completion order. Per-image failures are logged and reported as skips;
/// the run fails only when the input cannot be listed, holds no images,
/// none of its images can be read, or the sink fails. The sink is
/// finished only after every row is written.
pub async fn run_extraction<E, S>(
    config: &PipelineConfig,
    estimator: Arc<E>,
    sink: &mut S,
) -> Result<RunReport, PipelineError>
where
    E: PoseEstimator + 'static,
    S: FeatureSink + ?Sized,
{
    config.validate()?;

    let images = frame_capture::list_images(&config.input_source, &config.image_extensions)
        .map_err(|source| PipelineError::Input {
            path: config.input_source.clone(),
            source,
        })?;
    if images.is_empty() {
        return Err(PipelineError::NoInput(config.input_source.clone()));
    }
    info!(
        "Extracting posture features from {} images in {} ({} workers)",
        images.len(),
        config.input_source.display(),
        config.workers
    );

    let required: Arc<[LandmarkName]> = config.required_landmarks.clone().into();
    let semaphore = Arc::new(Semaphore::new(config.workers));
    let mut tasks = JoinSet::new();

    for image in &images {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?;
        let image = image.clone();
        let estimator = Arc::clone(&estimator);
        let required = Arc::clone(&required);

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let outcome = process_image(&image, estimator.as_ref(), &required);
            (basename(&image), outcome)
        });
    }

    let mut rows = Vec::with_capacity(images.len());
    let mut skipped = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        let (filename, outcome) = joined.map_err(|e| PipelineError::Worker(e.to_string()))?;
        match outcome {
            Ok(features) => {
                debug!("Extracted features for {}", filename);
                rows.push(FeatureRow::new(filename, features));
            }
            Err(reason) => {
                warn!("Skipped {}: {}", filename, reason);
                skipped.push(SkippedFrame { filename, reason });
            }
        }
    }

    let unreadable = skipped
        .iter()
        .filter(|frame| matches!(frame.reason, SkipReason::Unreadable(_)))
        .count();
    if unreadable == images.len() {
        return Err(PipelineError::NoFrames(config.input_source.clone()));
    }

    rows.sort_by(|a, b| a.filename.cmp(&b.filename));
    skipped.sort_by(|a, b| a.filename.cmp(&b.filename));

    let rows_written = sink.write_rows(&rows)?;
    sink.finish()?;

    let report = RunReport {
        images_found: images.len(),
        rows_written,
        skipped,
    };
    info!("{}", report);

    Ok(report)
}
