//! Posture Feature Engine
//!
//! Derives nine geometric posture descriptors (angles, ratios, depth
//! differences) from the body landmarks of a single detected person.
//! The extractor is pure: no state, no I/O.

mod error;
mod features;
pub mod geometry;
mod landmark;

pub use error::FeatureError;
pub use features::{FeatureVector, PostureFeatureExtractor, FEATURE_DIMENSION};
pub use landmark::{Landmark, LandmarkName, LandmarkProvider, LandmarkSet, LANDMARK_COUNT};
