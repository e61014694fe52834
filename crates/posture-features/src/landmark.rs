//! Body landmark types

use crate::error::FeatureError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Number of landmarks in the BlazePose body topology
pub const LANDMARK_COUNT: usize = 33;

/// A single 3D landmark as reported by the pose estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized horizontal image coordinate (usually 0..1)
    pub x: f64,
    /// Normalized vertical image coordinate (usually 0..1, grows downwards)
    pub y: f64,
    /// Relative depth, scale defined by the estimator
    pub z: f64,
    /// Detection confidence (0..1)
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

fn default_visibility() -> f64 {
    1.0
}

impl Landmark {
    /// Create a fully visible landmark
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 1.0,
        }
    }

    /// Set the visibility score
    pub const fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Anatomical landmark names, in estimator index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl LandmarkName {
    /// Every landmark, in estimator index order
    pub const ALL: [LandmarkName; LANDMARK_COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// The landmarks read by the posture feature formulas
    pub const REQUIRED: [LandmarkName; 9] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
    ];

    /// Position in the estimator's output sequence
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name for the given estimator index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Snake-case name, e.g. `right_ear`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandmarkName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown landmark name: {}", s))
    }
}

/// Anything that can hand out named 3D points
pub trait LandmarkProvider {
    /// Look up a landmark by name, `None` if absent
    fn landmark(&self, name: LandmarkName) -> Option<Landmark>;

    /// Look up a landmark, failing with the missing name
    fn require(&self, name: LandmarkName) -> Result<Landmark, FeatureError> {
        self.landmark(name)
            .ok_or(FeatureError::MissingLandmark { name })
    }
}

/// Landmarks of one detected body, one slot per anatomical name
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    slots: [Option<Landmark>; LANDMARK_COUNT],
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self {
            slots: [None; LANDMARK_COUNT],
        }
    }
}

impl LandmarkSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the estimator's ordered output.
    ///
    /// Slot `i` receives `points[i]`. A short sequence leaves the tail
    /// landmarks absent; points past the topology size are ignored.
    pub fn from_ordered(points: &[Landmark]) -> Self {
        let mut set = Self::default();
        for (slot, point) in set.slots.iter_mut().zip(points) {
            *slot = Some(*point);
        }
        set
    }

    /// Set a landmark
    pub fn with(mut self, name: LandmarkName, landmark: Landmark) -> Self {
        self.slots[name.index()] = Some(landmark);
        self
    }

    /// Remove a landmark
    pub fn without(mut self, name: LandmarkName) -> Self {
        self.slots[name.index()] = None;
        self
    }

    /// Get a landmark by name
    pub fn get(&self, name: LandmarkName) -> Option<Landmark> {
        self.slots[name.index()]
    }

    /// Names from `names` that have no landmark in this set
    pub fn missing(&self, names: &[LandmarkName]) -> Vec<LandmarkName> {
        names
            .iter()
            .copied()
            .filter(|name| self.get(*name).is_none())
            .collect()
    }

    /// Number of present landmarks
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if no landmark is present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate present landmarks with their names
    pub fn iter(&self) -> impl Iterator<Item = (LandmarkName, Landmark)> + '_ {
        LandmarkName::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(name, slot)| slot.map(|lm| (*name, lm)))
    }
}

impl LandmarkProvider for LandmarkSet {
    fn landmark(&self, name: LandmarkName) -> Option<Landmark> {
        self.get(name)
    }
}

impl LandmarkProvider for HashMap<LandmarkName, Landmark> {
    fn landmark(&self, name: LandmarkName) -> Option<Landmark> {
        self.get(&name).copied()
    }
}
