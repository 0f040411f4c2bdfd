//! Result sinks: persisting evaluation reports.

use crate::error::SweepError;
use crate::eval::EvaluationResult;
use crate::persistence;
use std::path::PathBuf;

pub trait ResultSink {
    /// Persist `result` under `destination`; returns where it landed.
    fn write(&self, result: &EvaluationResult, destination: &str) -> Result<PathBuf, SweepError>;
}

/// Writes each report as a text file under one output directory.
#[derive(Debug, Clone)]
pub struct FileResultSink {
    output_dir: PathBuf,
}

impl FileResultSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ResultSink for FileResultSink {
    fn write(&self, result: &EvaluationResult, destination: &str) -> Result<PathBuf, SweepError> {
        let path = self.output_dir.join(destination);
        persistence::atomic_write(&path, result.render().as_bytes())
            .map_err(|e| SweepError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "Report written");
        Ok(path)
    }
}
