//! ML-kNN: per-label Bayesian estimate over neighbour label counts.

use crate::data::MultiLabelDataset;
use crate::error::ModelError;
use crate::learners::neighbors::{NeighborIndex, column_kinds};
use crate::learners::{
    MultiLabelLearner, MultiLabelOutput, TrainedModel, check_query, check_trainable,
};

pub const DEFAULT_NEIGHBORS: usize = 10;
pub const DEFAULT_SMOOTHING: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MlKnn {
    pub k: usize,
    pub smooth: f64,
}

impl Default for MlKnn {
    fn default() -> Self {
        Self {
            k: DEFAULT_NEIGHBORS,
            smooth: DEFAULT_SMOOTHING,
        }
    }
}

impl MultiLabelLearner for MlKnn {
    fn name(&self) -> &str {
        "MLkNN"
    }

    fn fit(&self, dataset: &MultiLabelDataset) -> Result<Box<dyn TrainedModel>, ModelError> {
        check_trainable(dataset)?;
        if self.k == 0 {
            return Err(ModelError::rejected("MLkNN needs k >= 1"));
        }
        let n = dataset.num_instances();
        let labels = dataset.num_labels();
        let s = self.smooth;
        let k = self.k;

        let index = NeighborIndex::build(
            &column_kinds(dataset.feature_attributes()),
            dataset.feature_rows().to_vec(),
        );

        let prior: Vec<f64> = (0..labels)
            .map(|l| {
                let count = dataset.target_rows().iter().filter(|t| t[l]).count() as f64;
                (s + count) / (2.0 * s + n as f64)
            })
            .collect();

        // with[l][c]: instances having label l whose neighbours carry l exactly c times
        let mut with = vec![vec![0usize; k + 1]; labels];
        let mut without = vec![vec![0usize; k + 1]; labels];
        for i in 0..n {
            let neighbours = index.nearest(dataset.features(i), k, Some(i));
            for l in 0..labels {
                let c = neighbours
                    .iter()
                    .filter(|&&j| dataset.targets(j)[l])
                    .count();
                if dataset.targets(i)[l] {
                    with[l][c] += 1;
                } else {
                    without[l][c] += 1;
                }
            }
        }

        let posterior = |counts: &Vec<usize>| -> Vec<f64> {
            let total: usize = counts.iter().sum();
            counts
                .iter()
                .map(|&c| (s + c as f64) / (s * (k + 1) as f64 + total as f64))
                .collect()
        };

        Ok(Box::new(MlKnnModel {
            k,
            index,
            targets: dataset.target_rows().to_vec(),
            prior,
            cond_with: with.iter().map(posterior).collect(),
            cond_without: without.iter().map(posterior).collect(),
        }))
    }
}

#[derive(Debug)]
pub struct MlKnnModel {
    k: usize,
    index: NeighborIndex,
    targets: Vec<Vec<bool>>,
    prior: Vec<f64>,
    cond_with: Vec<Vec<f64>>,
    cond_without: Vec<Vec<f64>>,
}

impl TrainedModel for MlKnnModel {
    fn name(&self) -> &str {
        "MLkNN"
    }

    fn num_labels(&self) -> usize {
        self.prior.len()
    }

    fn num_features(&self) -> usize {
        self.index.dimensions()
    }

    fn predict(&self, features: &[f64]) -> Result<MultiLabelOutput, ModelError> {
        check_query(self.num_features(), features)?;
        let neighbours = self.index.nearest(features, self.k, None);
        let mut bipartition = Vec::with_capacity(self.prior.len());
        let mut confidences = Vec::with_capacity(self.prior.len());
        for l in 0..self.prior.len() {
            let c = neighbours.iter().filter(|&&j| self.targets[j][l]).count();
            let p_in = self.prior[l] * self.cond_with[l][c];
            let p_out = (1.0 - self.prior[l]) * self.cond_without[l][c];
            bipartition.push(p_in >= p_out);
            let total = p_in + p_out;
            confidences.push(if total > 0.0 { p_in / total } else { 0.5 });
        }
        Ok(MultiLabelOutput::new(bipartition, confidences))
    }
}
