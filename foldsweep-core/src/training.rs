//! Fitting a learner on a training partition.

use crate::data::MultiLabelDataset;
use crate::error::SweepError;
use crate::learners::{MultiLabelLearner, TrainedModel};
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct Trainer;

impl Trainer {
    /// Fit `learner` on `dataset`. Learner rejections surface as
    /// [`SweepError::ModelBuild`] naming both the classifier and the dataset.
    pub fn fit(
        &self,
        learner: &dyn MultiLabelLearner,
        dataset: &MultiLabelDataset,
    ) -> Result<Box<dyn TrainedModel>, SweepError> {
        let started = Instant::now();
        let model = learner
            .fit(dataset)
            .map_err(|source| SweepError::ModelBuild {
                classifier: learner.name().to_string(),
                dataset: dataset.name().to_string(),
                source,
            })?;
        tracing::debug!(
            classifier = learner.name(),
            dataset = dataset.name(),
            instances = dataset.num_instances(),
            labels = dataset.num_labels(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model fitted"
        );
        Ok(model)
    }
}
