//! Classifier factory: the closed set of classifier variants and their
//! fixed hyperparameters.

use crate::learners::brknn::BrKnn;
use crate::learners::chain::ClassifierChain;
use crate::learners::hmc::Hmc;
use crate::learners::knn::Knn;
use crate::learners::mlknn::MlKnn;
use crate::learners::powerset::LabelPowerset;
use crate::learners::MultiLabelLearner;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Neighbour count used by the transformation methods' kNN base learner.
pub const TRANSFORMATION_BASE_NEIGHBORS: usize = 10;

/// Classifier variants, in sweep order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    MlKnn,
    BrKnn,
    Chain,
    LabelPowerset,
    HmcThreshold,
    HmcAlgorithm,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 6] = [
        ClassifierKind::MlKnn,
        ClassifierKind::BrKnn,
        ClassifierKind::Chain,
        ClassifierKind::LabelPowerset,
        ClassifierKind::HmcThreshold,
        ClassifierKind::HmcAlgorithm,
    ];

    /// Name used in output artifact names and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MlKnn => "MLkNN",
            Self::BrKnn => "BRkNN",
            Self::Chain => "Chain",
            Self::LabelPowerset => "LP",
            Self::HmcThreshold => "HMC_T",
            Self::HmcAlgorithm => "HMC_A",
        }
    }

    /// Key of the enablement option.
    pub fn option_key(&self) -> &'static str {
        match self {
            Self::MlKnn => "mlknn",
            Self::BrKnn => "brknn",
            Self::Chain => "chain",
            Self::LabelPowerset => "lp",
            Self::HmcThreshold => "hmc_t",
            Self::HmcAlgorithm => "hmc_a",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Base learner plugged into a transformation or hierarchy method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BaseLearner {
    Knn { k: usize },
    MlKnn { k: usize, smooth: f64 },
    BrKnn { k: usize },
}

impl BaseLearner {
    fn build(&self) -> Box<dyn MultiLabelLearner> {
        match *self {
            BaseLearner::Knn { k } => Box::new(LabelPowerset::new(Knn::with_k(k))),
            BaseLearner::MlKnn { k, smooth } => Box::new(MlKnn { k, smooth }),
            BaseLearner::BrKnn { k } => Box::new(BrKnn { k }),
        }
    }

    fn knn(&self) -> Knn {
        match *self {
            BaseLearner::Knn { k } | BaseLearner::MlKnn { k, .. } | BaseLearner::BrKnn { k } => {
                Knn::with_k(k)
            }
        }
    }
}

/// A resolved classifier: its kind plus the hyperparameters it will run with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSpec {
    pub kind: ClassifierKind,
    /// Neighbour count of the classifier itself (instance-based kinds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbors: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseLearner>,
}

impl ClassifierSpec {
    /// The fixed configuration for `kind`.
    pub fn resolve(kind: ClassifierKind) -> Self {
        let base_knn = BaseLearner::Knn {
            k: TRANSFORMATION_BASE_NEIGHBORS,
        };
        let (neighbors, base) = match kind {
            ClassifierKind::MlKnn => (Some(crate::learners::mlknn::DEFAULT_NEIGHBORS), None),
            ClassifierKind::BrKnn => (Some(crate::learners::brknn::DEFAULT_NEIGHBORS), None),
            ClassifierKind::Chain => (None, Some(base_knn)),
            ClassifierKind::LabelPowerset => (None, Some(base_knn)),
            ClassifierKind::HmcThreshold => (None, None),
            ClassifierKind::HmcAlgorithm => (
                None,
                Some(BaseLearner::MlKnn {
                    k: crate::learners::mlknn::DEFAULT_NEIGHBORS,
                    smooth: crate::learners::mlknn::DEFAULT_SMOOTHING,
                }),
            ),
        };
        Self {
            kind,
            neighbors,
            base,
        }
    }

    /// Instantiate an untrained learner. Allocation only.
    pub fn build(&self) -> Box<dyn MultiLabelLearner> {
        let k = |default: usize| self.neighbors.unwrap_or(default);
        match self.kind {
            ClassifierKind::MlKnn => Box::new(MlKnn {
                k: k(crate::learners::mlknn::DEFAULT_NEIGHBORS),
                ..MlKnn::default()
            }),
            ClassifierKind::BrKnn => Box::new(BrKnn {
                k: k(crate::learners::brknn::DEFAULT_NEIGHBORS),
            }),
            ClassifierKind::Chain => Box::new(ClassifierChain::new(self.transformation_base())),
            ClassifierKind::LabelPowerset => {
                Box::new(LabelPowerset::new(self.transformation_base()))
            }
            ClassifierKind::HmcThreshold | ClassifierKind::HmcAlgorithm => {
                let node_learner: Box<dyn MultiLabelLearner> = match &self.base {
                    Some(base) => base.build(),
                    None => Box::new(BrKnn::default()),
                };
                Box::new(Hmc::new(self.kind.display_name(), node_learner))
            }
        }
    }

    fn transformation_base(&self) -> Knn {
        self.base
            .as_ref()
            .map(BaseLearner::knn)
            .unwrap_or_else(|| Knn::with_k(TRANSFORMATION_BASE_NEIGHBORS))
    }
}

/// Source of untrained learners for the sweep.
pub trait LearnerFactory {
    fn create(&self, kind: ClassifierKind) -> Box<dyn MultiLabelLearner>;
}

/// Builds each kind from its fixed [`ClassifierSpec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierFactory;

impl LearnerFactory for ClassifierFactory {
    fn create(&self, kind: ClassifierKind) -> Box<dyn MultiLabelLearner> {
        ClassifierSpec::resolve(kind).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_builds_with_its_display_name() {
        for kind in ClassifierKind::ALL {
            let learner = ClassifierFactory.create(kind);
            assert_eq!(learner.name(), kind.display_name());
        }
    }

    #[test]
    fn test_fixed_hyperparameters() {
        assert_eq!(ClassifierSpec::resolve(ClassifierKind::MlKnn).neighbors, Some(10));
        assert_eq!(
            ClassifierSpec::resolve(ClassifierKind::Chain).base,
            Some(BaseLearner::Knn { k: 10 })
        );
        assert_eq!(
            ClassifierSpec::resolve(ClassifierKind::LabelPowerset).base,
            Some(BaseLearner::Knn { k: 10 })
        );
        assert_eq!(ClassifierSpec::resolve(ClassifierKind::HmcThreshold).base, None);
        assert!(matches!(
            ClassifierSpec::resolve(ClassifierKind::HmcAlgorithm).base,
            Some(BaseLearner::MlKnn { k: 10, .. })
        ));
    }

    #[test]
    fn test_spec_serializes_compactly() {
        let json = serde_json::to_value(ClassifierSpec::resolve(ClassifierKind::Chain)).unwrap();
        assert_eq!(json["kind"], "chain");
        assert_eq!(json["base"]["type"], "knn");
        assert!(json.get("neighbors").is_none());
    }

    #[test]
    fn test_option_keys_are_unique() {
        let mut keys: Vec<_> = ClassifierKind::ALL.iter().map(|k| k.option_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 6);
    }
}
