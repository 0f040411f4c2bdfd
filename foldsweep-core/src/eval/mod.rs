//! Evaluation: measures, the fixed registry and the evaluator that drives them.

pub mod evaluator;
pub mod measures;
pub mod registry;

pub use evaluator::{EvaluationResult, Evaluator, MeasureValue};
pub use measures::Measure;
