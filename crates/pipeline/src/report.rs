//! Extraction run reporting

use posture_features::LandmarkName;
use std::collections::BTreeMap;
use std::fmt;

/// Why a frame produced no row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The image could not be decoded
    Unreadable(String),
    /// The estimator failed on this image
    EstimatorFailed(String),
    /// The estimator found no body
    NoDetection,
    /// A required landmark was absent
    MissingLandmark(LandmarkName),
}

impl SkipReason {
    /// Grouping key for summaries
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::Unreadable(_) => "unreadable",
            SkipReason::EstimatorFailed(_) => "estimator_failed",
            SkipReason::NoDetection => "no_detection",
            SkipReason::MissingLandmark(_) => "missing_landmark",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(msg) => write!(f, "unreadable image: {}", msg),
            SkipReason::EstimatorFailed(msg) => write!(f, "estimator failed: {}", msg),
            SkipReason::NoDetection => f.write_str("no landmarks detected"),
            SkipReason::MissingLandmark(name) => write!(f, "missing landmark {}", name),
        }
    }
}

/// A frame excluded from the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFrame {
    pub filename: String,
    pub reason: SkipReason,
}

/// Outcome of an extraction run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Candidate images found in the input
    pub images_found: usize,
    /// Rows handed to the sink
    pub rows_written: usize,
    /// Frames without a row, ordered by filename
    pub skipped: Vec<SkippedFrame>,
}

impl RunReport {
    /// Skipped frame counts per reason kind
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for frame in &self.skipped {
            *counts.entry(frame.reason.kind()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extracted {} posture feature rows from {} images, skipped {}",
            self.rows_written,
            self.images_found,
            self.skipped.len()
        )?;
        let counts = self.skip_counts();
        if !counts.is_empty() {
            let parts: Vec<String> = counts
                .iter()
                .map(|(kind, count)| format!("{}: {}", kind, count))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}
