//! Storage Layer
//!
//! Persists posture feature rows: one row per processed frame, keyed by
//! the frame's filename.

mod sink;

pub use sink::{CsvSink, FeatureRow, FeatureSink, MemorySink, COLUMNS};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Sink for {0} is already finished")]
    Finished(String),
}
