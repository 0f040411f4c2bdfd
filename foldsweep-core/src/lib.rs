//! # foldsweep-core: leave-one-fold-out multi-label experiments
//!
//! Trains every enabled classifier on every (technique, fold, axis) partition
//! and evaluates each model against the nine held-out folds, writing one
//! report of sixteen multi-label measures per pairing.
//!
//! ## Pipeline
//!
//! 1. **Plan**: [`SweepPlan`] enumerates training tuples from [`SweepConfig`]
//! 2. **Load**: a [`DatasetRepository`] joins `.bsi` features with `.labels` structures
//! 3. **Fit**: the [`Trainer`] fits a learner built by the [`LearnerFactory`]
//! 4. **Evaluate**: the [`Evaluator`] feeds predictions through the measure registry
//! 5. **Write**: a [`ResultSink`] persists each report atomically
//!
//! Any failure aborts the sweep; see [`SweepController`].

// Foundation
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod persistence;

// Data
pub mod data;

// Learning
pub mod learners;
pub mod training;

// Evaluation & output
pub mod eval;
pub mod sink;

// Orchestration
pub mod sweep;

// Re-exports
pub use config::{ConfigOverrides, SweepConfig, load_config};
pub use data::{DatasetRepository, FileDatasetRepository, MultiLabelDataset, PartitionName};
pub use diagnostics::{DiagnosticSink, MemoryDiagnostics, TracingDiagnostics};
pub use error::{MeasureError, ModelError, SweepError};
pub use eval::{EvaluationResult, Evaluator, Measure};
pub use learners::{
    ClassifierFactory, ClassifierKind, LearnerFactory, MultiLabelLearner, MultiLabelOutput,
    TrainedModel,
};
pub use sink::{FileResultSink, ResultSink};
pub use sweep::{SweepController, SweepPlan, SweepState, SweepSummary};
pub use training::Trainer;
