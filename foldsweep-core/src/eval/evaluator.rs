//! Drives a trained model over a test partition and collects measure values.

use crate::data::MultiLabelDataset;
use crate::error::SweepError;
use crate::eval::measures::Measure;
use crate::learners::TrainedModel;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureValue {
    pub name: String,
    pub value: f64,
}

/// Outcome of one model/test-partition evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub model: String,
    pub dataset: String,
    pub examples: usize,
    pub measures: Vec<MeasureValue>,
}

impl EvaluationResult {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.measures
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }

    /// One `<name>: <value>` line per measure, four decimals, `NaN` when undefined.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for m in &self.measures {
            out.push_str(&m.name);
            out.push_str(": ");
            if m.value.is_nan() {
                out.push_str("NaN");
            } else {
                out.push_str(&format!("{:.4}", m.value));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn evaluate(
        &self,
        model: &dyn TrainedModel,
        test: &MultiLabelDataset,
        measures: &mut [Box<dyn Measure>],
    ) -> Result<EvaluationResult, SweepError> {
        if test.num_instances() == 0 {
            return Err(SweepError::evaluation_argument(format!(
                "test dataset {} has no instances",
                test.name()
            )));
        }
        if model.num_labels() != test.num_labels() {
            return Err(SweepError::evaluation_argument(format!(
                "model {} predicts {} labels but {} has {}",
                model.name(),
                model.num_labels(),
                test.name(),
                test.num_labels()
            )));
        }
        if model.num_features() != test.num_features() {
            return Err(SweepError::evaluation_argument(format!(
                "model {} expects {} features but {} has {}",
                model.name(),
                model.num_features(),
                test.name(),
                test.num_features()
            )));
        }
        for measure in measures.iter() {
            if let Some(expected) = measure.expected_labels()
                && expected != test.num_labels()
            {
                return Err(SweepError::evaluation_argument(format!(
                    "{} was built for {expected} labels but {} has {}",
                    measure.name(),
                    test.name(),
                    test.num_labels()
                )));
            }
        }

        for measure in measures.iter_mut() {
            measure.reset();
        }

        for i in 0..test.num_instances() {
            let prediction = model.predict(test.features(i)).map_err(|e| {
                SweepError::evaluation(format!(
                    "{} failed on instance {i} of {}: {e}",
                    model.name(),
                    test.name()
                ))
            })?;
            if !prediction.is_well_formed() || prediction.num_labels() != test.num_labels() {
                return Err(SweepError::evaluation(format!(
                    "{} returned a malformed prediction for instance {i} of {}",
                    model.name(),
                    test.name()
                )));
            }
            for measure in measures.iter_mut() {
                measure.update(&prediction, test.targets(i))?;
            }
        }

        let result = EvaluationResult {
            model: model.name().to_string(),
            dataset: test.name().to_string(),
            examples: test.num_instances(),
            measures: measures
                .iter()
                .map(|m| MeasureValue {
                    name: m.name().to_string(),
                    value: m.value(),
                })
                .collect(),
        };
        tracing::debug!(
            model = %result.model,
            dataset = %result.dataset,
            examples = result.examples,
            "Evaluation complete"
        );
        Ok(result)
    }
}
