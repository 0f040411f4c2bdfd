//! Validated multi-label datasets.

use crate::data::instances::{Attribute, AttributeKind, FeatureDataset};
use crate::data::labels::LabelsMetaData;
use crate::error::SweepError;

/// Feature data joined with its label structure.
///
/// Labels are ordered by attribute position; features are every non-label
/// attribute, also in attribute order. The label descriptor is kept verbatim.
#[derive(Debug, Clone)]
pub struct MultiLabelDataset {
    name: String,
    feature_attributes: Vec<Attribute>,
    label_names: Vec<String>,
    features: Vec<Vec<f64>>,
    targets: Vec<Vec<bool>>,
    structure: LabelsMetaData,
}

impl MultiLabelDataset {
    /// Join `data` and `structure`, failing on any structural inconsistency.
    pub fn new(
        name: impl Into<String>,
        data: FeatureDataset,
        structure: LabelsMetaData,
    ) -> Result<Self, SweepError> {
        let name = name.into();
        let invalid = |reason: String| SweepError::validation(name.clone(), reason);

        let names = structure.label_names();
        if names.is_empty() {
            return Err(invalid("label structure declares no labels".into()));
        }
        if let Some(dup) = structure.duplicate_name() {
            return Err(invalid(format!("label '{dup}' declared more than once")));
        }

        let mut is_label = vec![false; data.num_attributes()];
        for label in &names {
            let idx = data
                .attribute_index(label)
                .ok_or_else(|| invalid(format!("label '{label}' has no matching attribute")))?;
            if !data.attributes[idx].is_binary() {
                return Err(invalid(format!(
                    "label attribute '{label}' must be nominal with two values"
                )));
            }
            is_label[idx] = true;
        }

        let arity = data.num_attributes();
        for (row_idx, row) in data.instances.iter().enumerate() {
            if row.len() != arity {
                return Err(invalid(format!(
                    "instance {row_idx} has {} values, expected {arity}",
                    row.len()
                )));
            }
            for (attr, value) in data.attributes.iter().zip(row) {
                if let AttributeKind::Nominal { values } = &attr.kind {
                    if value.is_nan() {
                        continue;
                    }
                    if value.fract() != 0.0 || *value < 0.0 || *value >= values.len() as f64 {
                        return Err(invalid(format!(
                            "instance {row_idx}: value {value} out of range for '{}'",
                            attr.name
                        )));
                    }
                }
            }
        }

        let label_indices: Vec<usize> = (0..arity).filter(|&i| is_label[i]).collect();
        let feature_indices: Vec<usize> = (0..arity).filter(|&i| !is_label[i]).collect();

        let mut targets = Vec::with_capacity(data.instances.len());
        for (row_idx, row) in data.instances.iter().enumerate() {
            let mut bits = Vec::with_capacity(label_indices.len());
            for &i in &label_indices {
                let v = row[i];
                if v.is_nan() {
                    return Err(invalid(format!(
                        "instance {row_idx}: label '{}' is missing",
                        data.attributes[i].name
                    )));
                }
                bits.push(v == 1.0);
            }
            targets.push(bits);
        }

        let features = data
            .instances
            .iter()
            .map(|row| feature_indices.iter().map(|&i| row[i]).collect())
            .collect();

        Ok(Self {
            name,
            feature_attributes: feature_indices
                .iter()
                .map(|&i| data.attributes[i].clone())
                .collect(),
            label_names: label_indices
                .iter()
                .map(|&i| data.attributes[i].name.clone())
                .collect(),
            features,
            targets,
            structure,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_instances(&self) -> usize {
        self.features.len()
    }

    pub fn num_labels(&self) -> usize {
        self.label_names.len()
    }

    pub fn num_features(&self) -> usize {
        self.feature_attributes.len()
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn label_index(&self, name: &str) -> Option<usize> {
        self.label_names.iter().position(|n| n == name)
    }

    pub fn feature_attributes(&self) -> &[Attribute] {
        &self.feature_attributes
    }

    /// The label descriptor exactly as loaded.
    pub fn label_structure(&self) -> &LabelsMetaData {
        &self.structure
    }

    pub fn features(&self, instance: usize) -> &[f64] {
        &self.features[instance]
    }

    pub fn targets(&self, instance: usize) -> &[bool] {
        &self.targets[instance]
    }

    pub fn feature_rows(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn target_rows(&self) -> &[Vec<bool>] {
        &self.targets
    }

    /// Restrict to `instances` and the named labels (flattened), keeping all features.
    pub fn select(&self, instances: &[usize], labels: &[&str]) -> Result<Self, SweepError> {
        let mut positions = Vec::with_capacity(labels.len());
        for label in labels {
            let idx = self.label_index(label).ok_or_else(|| {
                SweepError::validation(self.name.clone(), format!("unknown label '{label}'"))
            })?;
            positions.push(idx);
        }
        let features = instances.iter().map(|&i| self.features[i].clone()).collect();
        let targets = instances
            .iter()
            .map(|&i| positions.iter().map(|&p| self.targets[i][p]).collect())
            .collect();
        Ok(Self {
            name: self.name.clone(),
            feature_attributes: self.feature_attributes.clone(),
            label_names: labels.iter().map(|l| l.to_string()).collect(),
            features,
            targets,
            structure: LabelsMetaData::flat(labels),
        })
    }
}
