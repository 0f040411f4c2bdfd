//! Raw feature data as produced by the extraction pipeline (`.bsi` artifacts).

use serde::{Deserialize, Serialize};

/// Attribute type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    Numeric,
    /// Values are stored as the index into `values`.
    Nominal { values: Vec<String> },
}

/// A single declared attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    pub fn nominal(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    /// A `{0, 1}` nominal attribute, the shape every label attribute must have.
    pub fn binary(name: impl Into<String>) -> Self {
        Self::nominal(name, &["0", "1"])
    }

    pub fn is_binary(&self) -> bool {
        matches!(&self.kind, AttributeKind::Nominal { values } if values.len() == 2)
    }
}

/// Ordered instances over a fixed attribute list.
///
/// `NaN` marks a missing value in memory and is written as `null` on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDataset {
    pub relation: String,
    pub attributes: Vec<Attribute>,
    #[serde(deserialize_with = "missing_as_nan")]
    pub instances: Vec<Vec<f64>>,
}

fn missing_as_nan<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let rows: Vec<Vec<Option<f64>>> = Deserialize::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect())
}

impl FeatureDataset {
    pub fn new(relation: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            relation: relation.into(),
            attributes,
            instances: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<f64>) {
        self.instances.push(row);
    }

    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }
}
