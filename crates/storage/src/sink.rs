//! Feature row sinks

use crate::StorageError;
use posture_features::FeatureVector;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Output columns, in order
pub const COLUMNS: [&str; 10] = [
    "filename",
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

/// One processed frame
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Source image basename
    pub filename: String,
    pub features: FeatureVector,
}

impl FeatureRow {
    pub fn new(filename: impl Into<String>, features: FeatureVector) -> Self {
        Self {
            filename: filename.into(),
            features,
        }
    }

    /// Row as text fields in column order
    pub fn to_record(&self) -> Vec<String> {
        std::iter::once(self.filename.clone())
            .chain(self.features.values().iter().map(|v| v.to_string()))
            .collect()
    }
}

/// Destination for feature rows
pub trait FeatureSink {
    /// Append rows in the given order, returning how many were written
    fn write_rows(&mut self, rows: &[FeatureRow]) -> Result<usize, StorageError>;

    /// Commit everything written so far
    fn finish(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// CSV file sink with a fixed header.
///
/// Rows go to a staging file beside the destination, which `finish`
/// renames into place. An unfinished sink removes its staging file on
/// drop and leaves any existing destination untouched.
pub struct CsvSink {
    path: PathBuf,
    staging: PathBuf,
    writer: Option<csv::Writer<File>>,
}

fn staging_path(path: &Path) -> Result<PathBuf, StorageError> {
    let name = path.file_name().ok_or_else(|| StorageError::Io {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
    })?;
    let mut staged = OsString::from(".");
    staged.push(name);
    staged.push(".partial");
    Ok(path.with_file_name(staged))
}

impl CsvSink {
    /// Open a staging file beside `path` and write the header.
    ///
    /// Missing parent directories are created.
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        let staging = staging_path(path)?;
        let io_err = |source| StorageError::Io {
            path: staging.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = File::create(&staging).map_err(io_err)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(COLUMNS)?;
        writer.flush().map_err(io_err)?;

        info!("Writing feature rows to {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            staging,
            writer: Some(writer),
        })
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.staging.display().to_string(),
            source,
        }
    }
}

impl FeatureSink for CsvSink {
    fn write_rows(&mut self, rows: &[FeatureRow]) -> Result<usize, StorageError> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(StorageError::Finished(self.path.display().to_string()));
        };
        for row in rows {
            writer.write_record(row.to_record())?;
        }
        if let Err(e) = writer.flush() {
            return Err(self.io_err(e));
        }

        debug!("Wrote {} rows to {}", rows.len(), self.staging.display());
        Ok(rows.len())
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer.flush().map_err(|e| self.io_err(e))?;
        drop(writer);

        std::fs::rename(&self.staging, &self.path).map_err(|source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        info!("Saved {}", self.path.display());
        Ok(())
    }
}

impl Drop for CsvSink {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            if let Err(e) = std::fs::remove_file(&self.staging) {
                warn!("Failed to remove {}: {}", self.staging.display(), e);
            }
        }
    }
}

/// In-memory sink
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Vec<FeatureRow>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows received so far
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }
}

impl FeatureSink for MemorySink {
    fn write_rows(&mut self, rows: &[FeatureRow]) -> Result<usize, StorageError> {
        self.rows.extend_from_slice(rows);
        Ok(rows.len())
    }
}
