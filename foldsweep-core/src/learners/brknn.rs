//! BR-kNN: binary relevance over one shared neighbour search.

use crate::data::MultiLabelDataset;
use crate::error::ModelError;
use crate::learners::neighbors::{NeighborIndex, column_kinds};
use crate::learners::{
    MultiLabelLearner, MultiLabelOutput, TrainedModel, check_query, check_trainable,
};

pub const DEFAULT_NEIGHBORS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrKnn {
    pub k: usize,
}

impl Default for BrKnn {
    fn default() -> Self {
        Self {
            k: DEFAULT_NEIGHBORS,
        }
    }
}

impl MultiLabelLearner for BrKnn {
    fn name(&self) -> &str {
        "BRkNN"
    }

    fn fit(&self, dataset: &MultiLabelDataset) -> Result<Box<dyn TrainedModel>, ModelError> {
        check_trainable(dataset)?;
        if self.k == 0 {
            return Err(ModelError::rejected("BRkNN needs k >= 1"));
        }
        Ok(Box::new(BrKnnModel {
            k: self.k,
            index: NeighborIndex::build(
                &column_kinds(dataset.feature_attributes()),
                dataset.feature_rows().to_vec(),
            ),
            targets: dataset.target_rows().to_vec(),
            labels: dataset.num_labels(),
        }))
    }
}

#[derive(Debug)]
pub struct BrKnnModel {
    k: usize,
    index: NeighborIndex,
    targets: Vec<Vec<bool>>,
    labels: usize,
}

impl TrainedModel for BrKnnModel {
    fn name(&self) -> &str {
        "BRkNN"
    }

    fn num_labels(&self) -> usize {
        self.labels
    }

    fn num_features(&self) -> usize {
        self.index.dimensions()
    }

    fn predict(&self, features: &[f64]) -> Result<MultiLabelOutput, ModelError> {
        check_query(self.num_features(), features)?;
        let neighbours = self.index.nearest(features, self.k, None);
        let seen = neighbours.len().max(1) as f64;
        let confidences = (0..self.labels)
            .map(|l| {
                neighbours.iter().filter(|&&j| self.targets[j][l]).count() as f64 / seen
            })
            .collect();
        Ok(MultiLabelOutput::with_threshold(confidences, 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learners::testing::clustered;

    #[test]
    fn test_confidence_is_neighbour_fraction() {
        let model = BrKnn { k: 4 }.fit(&clustered()).unwrap();
        let out = model.predict(&[0.0, 0.5]).unwrap();
        assert_eq!(out.confidences()[0], 1.0);
        assert_eq!(out.confidences()[1], 0.0);
        assert!(out.bipartition()[0]);
        assert!(!out.bipartition()[1]);
        assert_eq!(out.ranking()[0], 1);
    }

    #[test]
    fn test_k_larger_than_training_set() {
        let ds = clustered().select(&[0, 1], &["a", "b"]).unwrap();
        let out = BrKnn::default().fit(&ds).unwrap().predict(&[0.0, 0.0]).unwrap();
        assert_eq!(out.confidences(), &[0.5, 0.5]);
    }
}
