//! Single-label k-nearest-neighbour classifier, the base learner for the
//! chain and powerset transformations.

use crate::error::ModelError;
use crate::learners::neighbors::{ColumnKind, NeighborIndex};

/// kNN configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Knn {
    pub k: usize,
}

impl Default for Knn {
    fn default() -> Self {
        Self { k: 1 }
    }
}

impl Knn {
    pub fn with_k(k: usize) -> Self {
        Self { k }
    }

    /// Store the training points. `classes[i]` must be below `n_classes`.
    pub fn fit(
        &self,
        kinds: &[ColumnKind],
        points: Vec<Vec<f64>>,
        classes: Vec<usize>,
        n_classes: usize,
    ) -> Result<KnnModel, ModelError> {
        if points.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if self.k == 0 {
            return Err(ModelError::rejected("kNN needs k >= 1"));
        }
        if points.len() != classes.len() {
            return Err(ModelError::rejected(format!(
                "{} points but {} class values",
                points.len(),
                classes.len()
            )));
        }
        if let Some(bad) = classes.iter().find(|&&c| c >= n_classes) {
            return Err(ModelError::rejected(format!(
                "class {bad} outside 0..{n_classes}"
            )));
        }
        Ok(KnnModel {
            k: self.k,
            index: NeighborIndex::build(kinds, points),
            classes,
            n_classes,
        })
    }
}

/// Fitted kNN model.
#[derive(Debug, Clone)]
pub struct KnnModel {
    k: usize,
    index: NeighborIndex,
    classes: Vec<usize>,
    n_classes: usize,
}

impl KnnModel {
    pub fn dimensions(&self) -> usize {
        self.index.dimensions()
    }

    /// Class distribution over the k nearest neighbours. Every class starts
    /// with a `1/N` floor so no class ever gets exactly zero mass.
    pub fn distribution(&self, query: &[f64]) -> Vec<f64> {
        let floor = 1.0 / self.index.len().max(1) as f64;
        let mut dist = vec![floor; self.n_classes];
        for i in self.index.nearest(query, self.k, None) {
            dist[self.classes[i]] += 1.0;
        }
        let total: f64 = dist.iter().sum();
        if total > 0.0 {
            for d in &mut dist {
                *d /= total;
            }
        }
        dist
    }

    /// Most probable class; ties go to the lower class index.
    pub fn classify(&self, query: &[f64]) -> usize {
        argmax(&self.distribution(query))
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
