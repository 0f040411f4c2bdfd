//! Declarative enumeration of the training tuples of a sweep.

use crate::config::SweepConfig;
use crate::data::PartitionName;
use crate::learners::ClassifierKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of partitions per (technique, axis).
pub const FOLDS: usize = 10;

/// Feature-extraction technique a partition was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technique {
    Ehd,
    Lbp,
    Sift,
    Gabor,
}

impl Technique {
    pub const ALL: [Technique; 4] = [
        Technique::Ehd,
        Technique::Lbp,
        Technique::Sift,
        Technique::Gabor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ehd => "Ehd",
            Self::Lbp => "Lbp",
            Self::Sift => "Sift",
            Self::Gabor => "Gabor",
        }
    }

    /// Key of the enablement option.
    pub fn option_key(&self) -> &'static str {
        match self {
            Self::Ehd => "ehd",
            Self::Lbp => "lbp",
            Self::Sift => "sift",
            Self::Gabor => "gabor",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label-hierarchy axis of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    T,
    D,
    A,
    B,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::T, Axis::D, Axis::A, Axis::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::T => "T",
            Self::D => "D",
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of training work: a model is fitted once per tuple and then
/// evaluated against every other fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub technique: Technique,
    pub train_fold: usize,
    pub axis: Axis,
    pub classifier: ClassifierKind,
}

impl TrainingConfig {
    pub fn train_partition(&self) -> PartitionName {
        PartitionName::new(self.technique, self.train_fold, self.axis)
    }

    /// Every fold except the training one, ascending.
    pub fn test_folds(&self) -> impl Iterator<Item = usize> + use<> {
        let train = self.train_fold;
        (0..FOLDS).filter(move |&j| j != train)
    }

    pub fn test_partition(&self, fold: usize) -> PartitionName {
        PartitionName::new(self.technique, fold, self.axis)
    }

    /// Report file name for the evaluation against `test_fold`.
    pub fn destination(&self, run_id: &str, test_fold: usize) -> String {
        format!(
            "{run_id}{}-{}-{}-Treino{}-Teste{test_fold}.csv",
            self.classifier, self.technique, self.axis, self.train_fold
        )
    }
}

impl fmt::Display for TrainingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/fold {}/axis {}",
            self.classifier, self.technique, self.train_fold, self.axis
        )
    }
}

/// The enabled techniques and classifiers, enumerated lazily in sweep order:
/// technique, training fold, axis, classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPlan {
    techniques: Vec<Technique>,
    classifiers: Vec<ClassifierKind>,
}

impl SweepPlan {
    pub fn new(config: &SweepConfig) -> Self {
        Self {
            techniques: Technique::ALL
                .into_iter()
                .filter(|t| config.technique_enabled(*t))
                .collect(),
            classifiers: ClassifierKind::ALL
                .into_iter()
                .filter(|k| config.classifier_enabled(*k))
                .collect(),
        }
    }

    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    pub fn classifiers(&self) -> &[ClassifierKind] {
        &self.classifiers
    }

    pub fn len(&self) -> usize {
        self.techniques.len() * FOLDS * Axis::ALL.len() * self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = TrainingConfig> + '_ {
        self.techniques.iter().flat_map(move |&technique| {
            (0..FOLDS).flat_map(move |train_fold| {
                Axis::ALL.into_iter().flat_map(move |axis| {
                    self.classifiers
                        .iter()
                        .map(move |&classifier| TrainingConfig {
                            technique,
                            train_fold,
                            axis,
                            classifier,
                        })
                })
            })
        })
    }
}
