//! Hierarchical multi-label classification.
//!
//! One node learner is fitted per internal node of the label hierarchy (plus a
//! virtual root over the top-level labels), each on the instances positive for
//! that node. Prediction walks down from the root and only descends into
//! children that were predicted positive.

use crate::data::MultiLabelDataset;
use crate::error::ModelError;
use crate::learners::{
    MultiLabelLearner, MultiLabelOutput, TrainedModel, check_query, check_trainable,
};

#[derive(Debug)]
pub struct Hmc {
    name: String,
    base: Box<dyn MultiLabelLearner>,
}

impl Hmc {
    pub fn new(name: impl Into<String>, base: Box<dyn MultiLabelLearner>) -> Self {
        Self {
            name: name.into(),
            base,
        }
    }

    /// Fit the node below `parent` (the virtual root when `None`), then recurse
    /// into every child that has children of its own.
    fn fit_node(
        &self,
        dataset: &MultiLabelDataset,
        parent: Option<&str>,
        nodes: &mut Vec<HmcNode>,
    ) -> Result<(), ModelError> {
        let structure = dataset.label_structure();
        let children = structure.children_of(parent);
        let parent_label = parent
            .map(|name| {
                dataset
                    .label_index(name)
                    .ok_or_else(|| ModelError::rejected(format!("label '{name}' not in dataset")))
            })
            .transpose()?;
        let child_names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        let child_labels = child_names
            .iter()
            .map(|name| {
                dataset
                    .label_index(name)
                    .ok_or_else(|| ModelError::rejected(format!("label '{name}' not in dataset")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows: Vec<usize> = match parent_label {
            None => (0..dataset.num_instances()).collect(),
            Some(p) => (0..dataset.num_instances())
                .filter(|&i| dataset.targets(i)[p])
                .collect(),
        };

        let model = if rows.is_empty() {
            tracing::debug!(
                node = parent.unwrap_or("<root>"),
                "No positive instances; children always predicted negative"
            );
            None
        } else {
            let subset = dataset
                .select(&rows, &child_names)
                .map_err(|e| ModelError::rejected(e.to_string()))?;
            Some(self.base.fit(&subset)?)
        };

        let slot = nodes.len();
        nodes.push(HmcNode {
            children: child_labels,
            model,
            child_nodes: Vec::new(),
        });

        for child in children.iter().filter(|c| !c.children.is_empty()) {
            let child_label = dataset
                .label_index(&child.name)
                .ok_or_else(|| ModelError::rejected(format!("label '{}' not in dataset", child.name)))?;
            let child_slot = nodes.len();
            self.fit_node(dataset, Some(&child.name), nodes)?;
            nodes[slot].child_nodes.push((child_label, child_slot));
        }
        Ok(())
    }
}

impl MultiLabelLearner for Hmc {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit(&self, dataset: &MultiLabelDataset) -> Result<Box<dyn TrainedModel>, ModelError> {
        check_trainable(dataset)?;
        let structure = dataset.label_structure();
        if structure.num_labels() != dataset.num_labels() {
            return Err(ModelError::rejected(format!(
                "hierarchy names {} labels but dataset has {}",
                structure.num_labels(),
                dataset.num_labels()
            )));
        }
        let mut nodes = Vec::new();
        self.fit_node(dataset, None, &mut nodes)?;
        tracing::debug!(
            classifier = %self.name,
            nodes = nodes.len(),
            hierarchical = structure.is_hierarchical(),
            "Hierarchy fitted"
        );
        Ok(Box::new(HmcModel {
            name: self.name.clone(),
            features: dataset.num_features(),
            labels: dataset.num_labels(),
            nodes,
        }))
    }
}

#[derive(Debug)]
struct HmcNode {
    /// Dataset label index of each child, in the node model's label order.
    children: Vec<usize>,
    model: Option<Box<dyn TrainedModel>>,
    /// (dataset label index, node slot) for children that are themselves internal.
    child_nodes: Vec<(usize, usize)>,
}

#[derive(Debug)]
pub struct HmcModel {
    name: String,
    features: usize,
    labels: usize,
    nodes: Vec<HmcNode>,
}

impl HmcModel {
    fn descend(
        &self,
        slot: usize,
        features: &[f64],
        bipartition: &mut [bool],
        confidences: &mut [f64],
    ) -> Result<(), ModelError> {
        let node = &self.nodes[slot];
        let Some(model) = &node.model else {
            return Ok(());
        };
        let out = model.predict(features)?;
        if out.num_labels() != node.children.len() {
            return Err(ModelError::rejected(format!(
                "node model returned {} labels for {} children",
                out.num_labels(),
                node.children.len()
            )));
        }
        for (pos, &label) in node.children.iter().enumerate() {
            bipartition[label] = out.bipartition()[pos];
            confidences[label] = out.confidences()[pos];
        }
        for &(label, child_slot) in &node.child_nodes {
            if bipartition[label] {
                self.descend(child_slot, features, bipartition, confidences)?;
            }
        }
        Ok(())
    }
}

impl TrainedModel for HmcModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_labels(&self) -> usize {
        self.labels
    }

    fn num_features(&self) -> usize {
        self.features
    }

    fn predict(&self, features: &[f64]) -> Result<MultiLabelOutput, ModelError> {
        check_query(self.features, features)?;
        let mut bipartition = vec![false; self.labels];
        let mut confidences = vec![0.0; self.labels];
        if !self.nodes.is_empty() {
            self.descend(0, features, &mut bipartition, &mut confidences)?;
        }
        Ok(MultiLabelOutput::new(bipartition, confidences))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Attribute, FeatureDataset, LabelNode, LabelsMetaData};
    use crate::learners::brknn::BrKnn;
    use crate::learners::mlknn::MlKnn;
    use crate::learners::testing::{clustered, hierarchical};

    fn label(ds: &MultiLabelDataset, name: &str) -> usize {
        ds.label_index(name).unwrap()
    }

    #[test]
    fn test_descends_into_positive_parent() {
        let ds = hierarchical();
        let model = Hmc::new("HMC_T", Box::new(BrKnn { k: 5 })).fit(&ds).unwrap();
        let out = model.predict(&[0.1]).unwrap();
        assert!(out.bipartition()[label(&ds, "animal")]);
        assert!(out.bipartition()[label(&ds, "cat")]);
        assert!(!out.bipartition()[label(&ds, "dog")]);
        assert!(!out.bipartition()[label(&ds, "plant")]);
    }

    #[test]
    fn test_negative_parent_silences_children() {
        let ds = hierarchical();
        let model = Hmc::new("HMC_A", Box::new(MlKnn::default())).fit(&ds).unwrap();
        let out = model.predict(&[10.2]).unwrap();
        assert!(out.bipartition()[label(&ds, "plant")]);
        assert!(!out.bipartition()[label(&ds, "animal")]);
        assert_eq!(out.confidences()[label(&ds, "cat")], 0.0);
        assert_eq!(out.confidences()[label(&ds, "dog")], 0.0);
    }

    /// `animal -> {mammal -> {cat, dog}, bird}`, `plant`, spread along one axis.
    fn three_levels() -> MultiLabelDataset {
        let mut data = FeatureDataset::new(
            "deep",
            ["x", "animal", "mammal", "cat", "dog", "bird", "plant"]
                .iter()
                .enumerate()
                .map(|(i, n)| if i == 0 { Attribute::numeric(*n) } else { Attribute::binary(*n) })
                .collect(),
        );
        for i in 0..12 {
            let jitter = i as f64 * 0.05;
            data.push(vec![jitter, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
            data.push(vec![5.0 + jitter, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
            data.push(vec![10.0 + jitter, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
            data.push(vec![15.0 + jitter, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        }
        let structure = LabelsMetaData::new(vec![
            LabelNode::with_children(
                "animal",
                vec![
                    LabelNode::with_children(
                        "mammal",
                        vec![LabelNode::leaf("cat"), LabelNode::leaf("dog")],
                    ),
                    LabelNode::leaf("bird"),
                ],
            ),
            LabelNode::leaf("plant"),
        ]);
        MultiLabelDataset::new("deep", data, structure).unwrap()
    }

    #[test]
    fn test_one_node_per_internal_label() {
        let ds = three_levels();
        let hmc = Hmc::new("HMC_T", Box::new(BrKnn { k: 5 }));
        let mut nodes = Vec::new();
        hmc.fit_node(&ds, None, &mut nodes).unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].children, vec![label(&ds, "animal"), label(&ds, "plant")]);
        assert_eq!(nodes[0].child_nodes, vec![(label(&ds, "animal"), 1)]);
        assert_eq!(nodes[1].children, vec![label(&ds, "mammal"), label(&ds, "bird")]);
        assert_eq!(nodes[1].child_nodes, vec![(label(&ds, "mammal"), 2)]);
        assert!(nodes[2].child_nodes.is_empty());
    }

    #[test]
    fn test_descends_through_every_level() {
        let ds = three_levels();
        let model = Hmc::new("HMC_T", Box::new(BrKnn { k: 5 })).fit(&ds).unwrap();
        let out = model.predict(&[5.1]).unwrap();
        for name in ["animal", "mammal", "dog"] {
            assert!(out.bipartition()[label(&ds, name)], "{name}");
        }
        for name in ["cat", "bird", "plant"] {
            assert!(!out.bipartition()[label(&ds, name)], "{name}");
        }
    }

    #[test]
    fn test_flat_structure_is_one_level() {
        let ds = clustered();
        let model = Hmc::new("HMC_T", Box::new(BrKnn::default())).fit(&ds).unwrap();
        let out = model.predict(&[10.0, 10.0]).unwrap();
        assert_eq!(out.num_labels(), 3);
        assert!(out.bipartition()[1]);
    }
}
