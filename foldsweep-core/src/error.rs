//! Error types for the foldsweep engine.
//!
//! Every variant of [`SweepError`] is fatal to a sweep. Leaf components report
//! narrower errors ([`ModelError`], [`MeasureError`]) which the trainer and
//! evaluator map into the sweep taxonomy.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a sweep run.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Deserialization error reading {}: {reason}", path.display())]
    Deserialization { path: PathBuf, reason: String },

    #[error("Dataset validation error in {dataset}: {reason}")]
    DatasetValidation { dataset: String, reason: String },

    #[error("Model build error for {classifier} on {dataset}: {source}")]
    ModelBuild {
        classifier: String,
        dataset: String,
        #[source]
        source: ModelError,
    },

    #[error("Invalid evaluation arguments: {0}")]
    EvaluationArgument(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SweepError {
    pub fn deserialization(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(dataset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DatasetValidation {
            dataset: dataset.into(),
            reason: reason.into(),
        }
    }

    pub fn evaluation_argument(msg: impl Into<String>) -> Self {
        Self::EvaluationArgument(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short stage label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deserialization { .. } => "deserialization",
            Self::DatasetValidation { .. } => "dataset validation",
            Self::ModelBuild { .. } => "model build",
            Self::EvaluationArgument(_) => "evaluation arguments",
            Self::Evaluation(_) => "evaluation",
            Self::Io { .. } => "result write",
            Self::Config(_) => "configuration",
        }
    }
}

/// Rejection raised by a learner while fitting or predicting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("training set has no instances")]
    EmptyDataset,

    #[error("training set declares no labels")]
    NoLabels,

    #[error("training set has no feature attributes")]
    NoFeatures,

    #[error("expected {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("{0}")]
    Rejected(String),
}

impl ModelError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Failure while a measure consumes a prediction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeasureError {
    #[error("{measure} expects {expected} labels, got {actual}")]
    LabelCount {
        measure: String,
        expected: usize,
        actual: usize,
    },

    #[error("{measure}: prediction covers {predicted} labels but truth has {truth}")]
    Shape {
        measure: String,
        predicted: usize,
        truth: usize,
    },
}

impl From<MeasureError> for SweepError {
    fn from(err: MeasureError) -> Self {
        match err {
            MeasureError::LabelCount { .. } => SweepError::EvaluationArgument(err.to_string()),
            MeasureError::Shape { .. } => SweepError::Evaluation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_errors_map_to_sweep_taxonomy() {
        let arg: SweepError = MeasureError::LabelCount {
            measure: "Micro-averaged Precision".into(),
            expected: 4,
            actual: 3,
        }
        .into();
        assert!(matches!(arg, SweepError::EvaluationArgument(_)));

        let eval: SweepError = MeasureError::Shape {
            measure: "Hamming Loss".into(),
            predicted: 2,
            truth: 3,
        }
        .into();
        assert!(matches!(eval, SweepError::Evaluation(_)));
    }

    #[test]
    fn test_display_names_stage_and_cause() {
        let err = SweepError::ModelBuild {
            classifier: "MLkNN".into(),
            dataset: "Ehd-Sub0-T".into(),
            source: ModelError::EmptyDataset,
        };
        let msg = err.to_string();
        assert!(msg.contains("MLkNN"));
        assert!(msg.contains("Ehd-Sub0-T"));
        assert!(msg.contains("no instances"));
        assert_eq!(err.kind(), "model build");
    }
}
