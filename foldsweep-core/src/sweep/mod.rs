//! The leave-one-fold-out sweep: what to run and the controller that runs it.

pub mod controller;
pub mod plan;

pub use controller::{SweepController, SweepState, SweepSummary};
pub use plan::{Axis, FOLDS, SweepPlan, Technique, TrainingConfig};
