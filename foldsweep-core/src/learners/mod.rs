//! Multi-label learners.
//!
//! Every classifier variant implements [`MultiLabelLearner`]; fitting yields an
//! immutable [`TrainedModel`]. The trainer and evaluator only see these traits.

pub mod brknn;
pub mod chain;
pub mod factory;
pub mod hmc;
pub mod knn;
pub mod mlknn;
pub mod neighbors;
pub mod powerset;

pub use factory::{BaseLearner, ClassifierFactory, ClassifierKind, ClassifierSpec, LearnerFactory};

use crate::data::MultiLabelDataset;
use crate::error::ModelError;
use std::fmt;

/// Prediction for one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLabelOutput {
    bipartition: Vec<bool>,
    confidences: Vec<f64>,
    ranking: Vec<usize>,
}

impl MultiLabelOutput {
    /// Ranking is derived from the confidences: rank 1 is the most confident
    /// label, ties go to the lower label index.
    pub fn new(bipartition: Vec<bool>, confidences: Vec<f64>) -> Self {
        let ranking = rank_by_confidence(&confidences);
        Self {
            bipartition,
            confidences,
            ranking,
        }
    }

    /// Bipartition from `confidence >= threshold`.
    pub fn with_threshold(confidences: Vec<f64>, threshold: f64) -> Self {
        let bipartition = confidences.iter().map(|&c| c >= threshold).collect();
        Self::new(bipartition, confidences)
    }

    pub fn num_labels(&self) -> usize {
        self.bipartition.len()
    }

    pub fn bipartition(&self) -> &[bool] {
        &self.bipartition
    }

    pub fn confidences(&self) -> &[f64] {
        &self.confidences
    }

    /// `ranking()[l]` is the 1-based rank of label `l`.
    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }

    /// Internally consistent: all three views have the same length and
    /// confidences are finite.
    pub fn is_well_formed(&self) -> bool {
        self.confidences.len() == self.bipartition.len()
            && self.ranking.len() == self.bipartition.len()
            && self.confidences.iter().all(|c| c.is_finite())
    }
}

fn rank_by_confidence(confidences: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..confidences.len()).collect();
    order.sort_by(|&a, &b| confidences[b].total_cmp(&confidences[a]).then(a.cmp(&b)));
    let mut ranking = vec![0; confidences.len()];
    for (position, label) in order.into_iter().enumerate() {
        ranking[label] = position + 1;
    }
    ranking
}

/// An untrained classifier configuration.
pub trait MultiLabelLearner: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Fit a fresh model. The learner itself is left untouched, so one
    /// configuration can be fitted many times (hierarchy nodes rely on this).
    fn fit(&self, dataset: &MultiLabelDataset) -> Result<Box<dyn TrainedModel>, ModelError>;
}

/// A fitted model. Prediction never mutates it.
pub trait TrainedModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn num_labels(&self) -> usize;

    fn num_features(&self) -> usize;

    fn predict(&self, features: &[f64]) -> Result<MultiLabelOutput, ModelError>;
}

/// Shared precondition checks for every learner.
pub(crate) fn check_trainable(dataset: &MultiLabelDataset) -> Result<(), ModelError> {
    if dataset.num_instances() == 0 {
        return Err(ModelError::EmptyDataset);
    }
    if dataset.num_labels() == 0 {
        return Err(ModelError::NoLabels);
    }
    if dataset.num_features() == 0 {
        return Err(ModelError::NoFeatures);
    }
    Ok(())
}

pub(crate) fn check_query(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::FeatureMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}
