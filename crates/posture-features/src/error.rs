//! Feature Extraction Error Types

use crate::landmark::LandmarkName;
use thiserror::Error;

/// Errors during posture feature extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// A landmark the formulas read is absent from the input
    #[error("Missing required landmark: {name}")]
    MissingLandmark { name: LandmarkName },
}
