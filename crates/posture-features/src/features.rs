//! Posture Feature Vector Assembly

use crate::error::FeatureError;
use crate::geometry::{directional_angle, euclidean_distance_3d, midpoint};
use crate::landmark::{LandmarkName, LandmarkProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 9;

/// Posture descriptors for one detected body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Orientation of the left -> right shoulder line (degrees)
    #[serde(rename = "Shoulder_Angle")]
    pub shoulder_angle: f64,
    /// Orientation of the left -> right eye line (degrees)
    #[serde(rename = "Head_Tilt_Angle")]
    pub head_tilt_angle: f64,
    /// Direction from the shoulder midpoint to the nose (degrees)
    #[serde(rename = "Neck_Inclination")]
    pub neck_inclination: f64,
    /// Unsigned horizontal nose offset in shoulder widths
    #[serde(rename = "Center_Offset_Ratio")]
    pub center_offset_ratio: f64,
    /// Nose depth relative to the shoulder midpoint
    #[serde(rename = "Forward_Lean_Depth")]
    pub forward_lean_depth: f64,
    /// Signed horizontal nose offset in shoulder widths
    #[serde(rename = "Face_Rotation")]
    pub face_rotation: f64,
    #[serde(rename = "Eye_Level_Difference")]
    pub eye_level_difference: f64,
    #[serde(rename = "Ear_Level_Difference")]
    pub ear_level_difference: f64,
    /// Unsigned orientation of the mouth line (degrees)
    #[serde(rename = "Mouth_Skew_Angle")]
    pub mouth_skew_angle: f64,
}

impl FeatureVector {
    /// Column names, in value order
    pub const NAMES: [&'static str; FEATURE_DIMENSION] = [
        "Shoulder_Angle",
        "Head_Tilt_Angle",
        "Neck_Inclination",
        "Center_Offset_Ratio",
        "Forward_Lean_Depth",
        "Face_Rotation",
        "Eye_Level_Difference",
        "Ear_Level_Difference",
        "Mouth_Skew_Angle",
    ];

    /// Feature values in column order
    pub fn values(&self) -> [f64; FEATURE_DIMENSION] {
        [
            self.shoulder_angle,
            self.head_tilt_angle,
            self.neck_inclination,
            self.center_offset_ratio,
            self.forward_lean_depth,
            self.face_rotation,
            self.eye_level_difference,
            self.ear_level_difference,
            self.mouth_skew_angle,
        ]
    }
}

/// Stateless posture feature extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct PostureFeatureExtractor;

impl PostureFeatureExtractor {
    /// Create a new feature extractor
    pub fn new() -> Self {
        Self
    }

    /// Derive the posture features from a landmark provider.
    ///
    /// Fails on the first absent landmark in [`LandmarkName::REQUIRED`]
    /// order. A zero shoulder width yields 0 for both width-normalized
    /// features.
    pub fn extract<P>(&self, landmarks: &P) -> Result<FeatureVector, FeatureError>
    where
        P: LandmarkProvider + ?Sized,
    {
        let nose = landmarks.require(LandmarkName::Nose)?;
        let left_eye = landmarks.require(LandmarkName::LeftEye)?;
        let right_eye = landmarks.require(LandmarkName::RightEye)?;
        let left_ear = landmarks.require(LandmarkName::LeftEar)?;
        let right_ear = landmarks.require(LandmarkName::RightEar)?;
        let mouth_left = landmarks.require(LandmarkName::MouthLeft)?;
        let mouth_right = landmarks.require(LandmarkName::MouthRight)?;
        let left_sh = landmarks.require(LandmarkName::LeftShoulder)?;
        let right_sh = landmarks.require(LandmarkName::RightShoulder)?;

        let mid_sh = midpoint(&left_sh, &right_sh);
        let shoulder_width = euclidean_distance_3d(&left_sh, &right_sh);
        let nose_offset_x = nose.x - mid_sh.x;

        let (center_offset_ratio, face_rotation) = if shoulder_width > 0.0 {
            (
                nose_offset_x.abs() / shoulder_width,
                nose_offset_x / shoulder_width,
            )
        } else {
            debug!("Shoulders coincide, width-normalized features set to 0");
            (0.0, 0.0)
        };

        Ok(FeatureVector {
            shoulder_angle: directional_angle(&left_sh, &right_sh),
            head_tilt_angle: directional_angle(&left_eye, &right_eye),
            neck_inclination: directional_angle(&mid_sh, &nose),
            center_offset_ratio,
            forward_lean_depth: nose.z - mid_sh.z,
            face_rotation,
            eye_level_difference: (left_eye.y - right_eye.y).abs(),
            ear_level_difference: (left_ear.y - right_ear.y).abs(),
            mouth_skew_angle: directional_angle(&mouth_left, &mouth_right).abs(),
        })
    }
}
