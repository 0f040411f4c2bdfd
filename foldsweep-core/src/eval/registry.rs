//! The fixed measure list every evaluation reports, in report order.

use crate::eval::measures::{
    ExampleBased, ExampleBasedMeasure, Measure, MicroAveraged, MicroMeasure, RankingBased,
    RankingMeasure,
};

/// Report names, in the order [`build`] returns the measures.
pub const MEASURE_NAMES: [&str; 16] = [
    "Hamming Loss",
    "Subset Accuracy",
    "Example-Based Precision",
    "Example-Based Recall",
    "Example-Based F Measure",
    "Example-Based Accuracy",
    "Example-Based Specificity",
    "Micro-averaged Precision",
    "Micro-averaged Recall",
    "Micro-averaged F-Measure",
    "Average Precision",
    "Coverage",
    "OneError",
    "IsError",
    "ErrorSetSize",
    "Ranking Loss",
];

/// Fresh measures for a dataset with `num_labels` labels.
pub fn build(num_labels: usize) -> Vec<Box<dyn Measure>> {
    let mut measures: Vec<Box<dyn Measure>> = Vec::with_capacity(MEASURE_NAMES.len());
    for kind in [
        ExampleBased::HammingLoss,
        ExampleBased::SubsetAccuracy,
        ExampleBased::Precision,
        ExampleBased::Recall,
        ExampleBased::FMeasure,
        ExampleBased::Accuracy,
        ExampleBased::Specificity,
    ] {
        measures.push(Box::new(ExampleBasedMeasure::new(kind)));
    }
    for kind in [
        MicroAveraged::Precision,
        MicroAveraged::Recall,
        MicroAveraged::FMeasure,
    ] {
        measures.push(Box::new(MicroMeasure::new(kind, num_labels)));
    }
    for kind in [
        RankingBased::AveragePrecision,
        RankingBased::Coverage,
        RankingBased::OneError,
        RankingBased::IsError,
        RankingBased::ErrorSetSize,
        RankingBased::RankingLoss,
    ] {
        measures.push(Box::new(RankingMeasure::new(kind)));
    }
    measures
}
