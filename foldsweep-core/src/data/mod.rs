//! Datasets: raw instances, label structures, validated multi-label joins and storage.

pub mod instances;
pub mod labels;
pub mod multilabel;
pub mod repository;

pub use instances::{Attribute, AttributeKind, FeatureDataset};
pub use labels::{LabelNode, LabelsMetaData};
pub use multilabel::MultiLabelDataset;
pub use repository::{DatasetRepository, FileDatasetRepository, PartitionName};
