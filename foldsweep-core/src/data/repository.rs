//! Dataset repository: resolves partition names to validated datasets.

use crate::data::instances::FeatureDataset;
use crate::data::labels::LabelsMetaData;
use crate::data::multilabel::MultiLabelDataset;
use crate::error::SweepError;
use crate::persistence;
use crate::sweep::plan::{Axis, Technique};
use std::fmt;
use std::path::PathBuf;

/// Extension of the feature-data artifact.
pub const FEATURES_EXTENSION: &str = "bsi";
/// Extension of the label-structure artifact.
pub const LABELS_EXTENSION: &str = "labels";

/// Identifies one partition: `<technique>-Sub<fold>-<axis>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionName {
    pub technique: Technique,
    pub fold: usize,
    pub axis: Axis,
}

impl PartitionName {
    pub fn new(technique: Technique, fold: usize, axis: Axis) -> Self {
        Self {
            technique,
            fold,
            axis,
        }
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Sub{}-{}", self.technique, self.fold, self.axis)
    }
}

/// Source of train/test partitions.
pub trait DatasetRepository {
    fn load(&self, name: &PartitionName) -> Result<MultiLabelDataset, SweepError>;
}

/// Repository over a directory of `.bsi` / `.labels` JSON artifacts.
#[derive(Debug, Clone)]
pub struct FileDatasetRepository {
    base_dir: PathBuf,
}

impl FileDatasetRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn artifact_path(&self, name: &PartitionName, extension: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.{extension}"))
    }

    pub fn load_features(&self, name: &PartitionName) -> Result<FeatureDataset, SweepError> {
        let path = self.artifact_path(name, FEATURES_EXTENSION);
        persistence::read_json(&path).map_err(|e| SweepError::deserialization(&path, e.to_string()))
    }

    pub fn load_labels(&self, name: &PartitionName) -> Result<LabelsMetaData, SweepError> {
        let path = self.artifact_path(name, LABELS_EXTENSION);
        persistence::read_json(&path).map_err(|e| SweepError::deserialization(&path, e.to_string()))
    }

    /// Write both artifacts for `name`, as the partitioning pipeline does.
    pub fn store(
        &self,
        name: &PartitionName,
        features: &FeatureDataset,
        labels: &LabelsMetaData,
    ) -> Result<(), SweepError> {
        let features_path = self.artifact_path(name, FEATURES_EXTENSION);
        let bytes = serde_json::to_vec(features)
            .map_err(|e| SweepError::io(&features_path, std::io::Error::other(e)))?;
        persistence::atomic_write(&features_path, &bytes)
            .map_err(|e| SweepError::io(&features_path, e))?;

        let labels_path = self.artifact_path(name, LABELS_EXTENSION);
        persistence::atomic_write_json(&labels_path, labels)
            .map_err(|e| SweepError::io(&labels_path, e))?;
        Ok(())
    }
}

impl DatasetRepository for FileDatasetRepository {
    fn load(&self, name: &PartitionName) -> Result<MultiLabelDataset, SweepError> {
        tracing::debug!(partition = %name, dir = %self.base_dir.display(), "Loading partition");
        let features = self.load_features(name)?;
        let labels = self.load_labels(name)?;
        let dataset = MultiLabelDataset::new(name.to_string(), features, labels)?;
        tracing::debug!(
            partition = %name,
            instances = dataset.num_instances(),
            labels = dataset.num_labels(),
            features = dataset.num_features(),
            "Partition loaded"
        );
        Ok(dataset)
    }
}
