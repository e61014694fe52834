//! Pose estimator adapters

use posture_features::{Landmark, LandmarkSet};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Estimator error types
#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("Failed to read landmarks {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed landmarks {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Body landmark detector for still images
pub trait PoseEstimator: Send + Sync {
    /// Landmarks of the detected body, `Ok(None)` if nobody was found
    fn estimate(&self, image: &Path) -> Result<Option<LandmarkSet>, EstimatorError>;
}

#[derive(Debug, Deserialize)]
struct SidecarFile {
    #[serde(default)]
    landmarks: Option<Vec<Landmark>>,
}

/// Reads precomputed landmarks from a JSON file next to each image.
///
/// `frame_000.jpg` pairs with `frame_000.json`:
/// `{"landmarks": [{"x": 0.5, "y": 0.4, "z": -0.1, "visibility": 0.99}, ...]}`
/// in estimator index order. A missing file, `null` or an empty list
/// means no detection.
#[derive(Debug, Clone, Default)]
pub struct SidecarEstimator {
    landmarks_dir: Option<PathBuf>,
}

impl SidecarEstimator {
    /// Look for sidecars in `landmarks_dir`, or beside the image when `None`
    pub fn new(landmarks_dir: Option<PathBuf>) -> Self {
        Self { landmarks_dir }
    }

    /// Sidecar path for an image
    pub fn sidecar_path(&self, image: &Path) -> PathBuf {
        let stem = image.file_stem().unwrap_or_default();
        let dir = match &self.landmarks_dir {
            Some(dir) => dir.as_path(),
            None => image.parent().unwrap_or_else(|| Path::new("")),
        };
        let mut name = stem.to_os_string();
        name.push(".json");
        dir.join(name)
    }
}

impl PoseEstimator for SidecarEstimator {
    fn estimate(&self, image: &Path) -> Result<Option<LandmarkSet>, EstimatorError> {
        let path = self.sidecar_path(image);
        if !path.exists() {
            debug!("No landmark sidecar for {}", image.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| EstimatorError::Io {
            path: path.clone(),
            source,
        })?;
        let sidecar: SidecarFile =
            serde_json::from_str(&content).map_err(|e| EstimatorError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        match sidecar.landmarks {
            Some(points) if !points.is_empty() => {
                debug!("Read {} landmarks from {}", points.len(), path.display());
                Ok(Some(LandmarkSet::from_ordered(&points)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posture_features::LandmarkName;

    #[test]
    fn test_sidecar_path_beside_image() {
        let estimator = SidecarEstimator::default();
        assert_eq!(
            estimator.sidecar_path(Path::new("frames/frame_007.jpg")),
            PathBuf::from("frames/frame_007.json")
        );
    }

    #[test]
    fn test_sidecar_path_in_landmarks_dir() {
        let estimator = SidecarEstimator::new(Some(PathBuf::from("landmarks")));
        assert_eq!(
            estimator.sidecar_path(Path::new("frames/frame_007.jpg")),
            PathBuf::from("landmarks/frame_007.json")
        );
    }

    #[test]
    fn test_reads_ordered_landmarks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"landmarks": [{"x": 0.5, "y": 0.4, "z": -0.1, "visibility": 0.9}, {"x": 0.45, "y": 0.35, "z": 0.0}]}"#,
        )
        .unwrap();

        let set = SidecarEstimator::default()
            .estimate(&dir.path().join("a.png"))
            .unwrap()
            .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(LandmarkName::Nose),
            Some(Landmark::new(0.5, 0.4, -0.1).with_visibility(0.9))
        );
        assert_eq!(set.get(LandmarkName::LeftEyeInner).map(|lm| lm.visibility), Some(1.0));
    }

    #[test]
    fn test_no_detection_forms() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("null.json"), r#"{"landmarks": null}"#).unwrap();
        std::fs::write(dir.path().join("empty.json"), r#"{"landmarks": []}"#).unwrap();
        std::fs::write(dir.path().join("bare.json"), "{}").unwrap();

        let estimator = SidecarEstimator::default();
        for name in ["null.png", "empty.png", "bare.png", "absent.png"] {
            assert!(estimator.estimate(&dir.path().join(name)).unwrap().is_none(), "{}", name);
        }
    }

    #[test]
    fn test_malformed_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), r#"{"landmarks": [{"x": "left"}]}"#).unwrap();

        let result = SidecarEstimator::default().estimate(&dir.path().join("bad.jpg"));
        assert!(matches!(result, Err(EstimatorError::Parse { .. })));
    }
}
