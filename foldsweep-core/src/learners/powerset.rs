//! Label powerset: each distinct training label set becomes one class.

use crate::data::MultiLabelDataset;
use crate::error::ModelError;
use crate::learners::knn::{Knn, KnnModel, argmax};
use crate::learners::neighbors::column_kinds;
use crate::learners::{
    MultiLabelLearner, MultiLabelOutput, TrainedModel, check_query, check_trainable,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPowerset {
    pub base: Knn,
}

impl LabelPowerset {
    pub fn new(base: Knn) -> Self {
        Self { base }
    }
}

impl MultiLabelLearner for LabelPowerset {
    fn name(&self) -> &str {
        "LP"
    }

    fn fit(&self, dataset: &MultiLabelDataset) -> Result<Box<dyn TrainedModel>, ModelError> {
        check_trainable(dataset)?;
        let mut class_of: HashMap<&[bool], usize> = HashMap::new();
        let mut label_sets: Vec<Vec<bool>> = Vec::new();
        let mut classes = Vec::with_capacity(dataset.num_instances());
        for targets in dataset.target_rows() {
            let class = *class_of.entry(targets.as_slice()).or_insert_with(|| {
                label_sets.push(targets.clone());
                label_sets.len() - 1
            });
            classes.push(class);
        }
        tracing::trace!(label_sets = label_sets.len(), "Label powerset classes built");

        let base = self.base.fit(
            &column_kinds(dataset.feature_attributes()),
            dataset.feature_rows().to_vec(),
            classes,
            label_sets.len(),
        )?;
        Ok(Box::new(PowersetModel {
            features: dataset.num_features(),
            labels: dataset.num_labels(),
            label_sets,
            base,
        }))
    }
}

#[derive(Debug)]
pub struct PowersetModel {
    features: usize,
    labels: usize,
    label_sets: Vec<Vec<bool>>,
    base: KnnModel,
}

impl TrainedModel for PowersetModel {
    fn name(&self) -> &str {
        "LP"
    }

    fn num_labels(&self) -> usize {
        self.labels
    }

    fn num_features(&self) -> usize {
        self.features
    }

    fn predict(&self, features: &[f64]) -> Result<MultiLabelOutput, ModelError> {
        check_query(self.features, features)?;
        let dist = self.base.distribution(features);
        let bipartition = self.label_sets[argmax(&dist)].clone();
        let confidences = (0..self.labels)
            .map(|l| {
                self.label_sets
                    .iter()
                    .zip(&dist)
                    .filter(|(set, _)| set[l])
                    .map(|(_, p)| p)
                    .sum::<f64>()
            })
            .collect();
        Ok(MultiLabelOutput::new(bipartition, confidences))
    }
}
