//! Classifier chain over a kNN base learner.
//!
//! Link `j` sees the features plus labels `0..j`; during prediction the
//! earlier links' decisions are fed forward in place of the true values.

use crate::data::MultiLabelDataset;
use crate::error::ModelError;
use crate::learners::knn::{Knn, KnnModel};
use crate::learners::neighbors::{ColumnKind, column_kinds};
use crate::learners::{
    MultiLabelLearner, MultiLabelOutput, TrainedModel, check_query, check_trainable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierChain {
    pub base: Knn,
}

impl ClassifierChain {
    pub fn new(base: Knn) -> Self {
        Self { base }
    }
}

impl MultiLabelLearner for ClassifierChain {
    fn name(&self) -> &str {
        "Chain"
    }

    fn fit(&self, dataset: &MultiLabelDataset) -> Result<Box<dyn TrainedModel>, ModelError> {
        check_trainable(dataset)?;
        let mut kinds = column_kinds(dataset.feature_attributes());
        let mut rows: Vec<Vec<f64>> = dataset.feature_rows().to_vec();
        let mut links = Vec::with_capacity(dataset.num_labels());

        for label in 0..dataset.num_labels() {
            let classes = dataset
                .target_rows()
                .iter()
                .map(|t| usize::from(t[label]))
                .collect();
            links.push(self.base.fit(&kinds, rows.clone(), classes, 2)?);

            kinds.push(ColumnKind::Nominal);
            for (row, targets) in rows.iter_mut().zip(dataset.target_rows()) {
                row.push(if targets[label] { 1.0 } else { 0.0 });
            }
        }

        Ok(Box::new(ChainModel {
            features: dataset.num_features(),
            links,
        }))
    }
}

#[derive(Debug)]
pub struct ChainModel {
    features: usize,
    links: Vec<KnnModel>,
}

impl TrainedModel for ChainModel {
    fn name(&self) -> &str {
        "Chain"
    }

    fn num_labels(&self) -> usize {
        self.links.len()
    }

    fn num_features(&self) -> usize {
        self.features
    }

    fn predict(&self, features: &[f64]) -> Result<MultiLabelOutput, ModelError> {
        check_query(self.features, features)?;
        let mut query = features.to_vec();
        let mut bipartition = Vec::with_capacity(self.links.len());
        let mut confidences = Vec::with_capacity(self.links.len());
        for link in &self.links {
            let dist = link.distribution(&query);
            let positive = dist[1] > dist[0];
            bipartition.push(positive);
            confidences.push(dist[1]);
            query.push(if positive { 1.0 } else { 0.0 });
        }
        Ok(MultiLabelOutput::new(bipartition, confidences))
    }
}
