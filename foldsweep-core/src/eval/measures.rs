//! Multi-label evaluation measures.
//!
//! Measures are stateful accumulators: `reset`, feed every (prediction, truth)
//! pair through `update`, then read `value`. Three families share the work:
//! example-based (averaged per instance), micro-averaged (pooled counts over
//! every label) and ranking-based (averaged over instances whose truth is
//! neither empty nor full).

use crate::error::MeasureError;
use crate::learners::MultiLabelOutput;
use std::fmt;

pub trait Measure: Send + fmt::Debug {
    fn name(&self) -> &str;

    /// Value a perfect classifier would score.
    fn ideal_value(&self) -> f64;

    /// Label count fixed at construction, for measures that take one.
    fn expected_labels(&self) -> Option<usize> {
        None
    }

    fn reset(&mut self);

    fn update(&mut self, prediction: &MultiLabelOutput, truth: &[bool]) -> Result<(), MeasureError>;

    /// Aggregate so far; `NaN` when nothing contributed.
    fn value(&self) -> f64;
}

/// Confusion counts for one instance or pooled over many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confusion {
    pub tp: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tn: usize,
}

impl Confusion {
    pub fn of(predicted: &[bool], truth: &[bool]) -> Self {
        let mut c = Confusion::default();
        for (&p, &t) in predicted.iter().zip(truth) {
            match (p, t) {
                (true, true) => c.tp += 1,
                (true, false) => c.fp += 1,
                (false, true) => c.fn_ += 1,
                (false, false) => c.tn += 1,
            }
        }
        c
    }

    fn add(&mut self, other: Confusion) {
        self.tp += other.tp;
        self.fp += other.fp;
        self.fn_ += other.fn_;
        self.tn += other.tn;
    }

    /// No positives predicted or present counts as perfect.
    pub fn precision(&self) -> f64 {
        if self.tp + self.fp + self.fn_ == 0 {
            1.0
        } else if self.tp + self.fp == 0 {
            0.0
        } else {
            self.tp as f64 / (self.tp + self.fp) as f64
        }
    }

    pub fn recall(&self) -> f64 {
        if self.tp + self.fp + self.fn_ == 0 {
            1.0
        } else if self.tp + self.fn_ == 0 {
            0.0
        } else {
            self.tp as f64 / (self.tp + self.fn_) as f64
        }
    }

    pub fn f_measure(&self) -> f64 {
        if self.tp + self.fp + self.fn_ == 0 {
            1.0
        } else {
            2.0 * self.tp as f64 / (2 * self.tp + self.fp + self.fn_) as f64
        }
    }

    pub fn jaccard(&self) -> f64 {
        let union = self.tp + self.fp + self.fn_;
        if union == 0 {
            1.0
        } else {
            self.tp as f64 / union as f64
        }
    }

    pub fn specificity(&self) -> f64 {
        if self.tn + self.fp == 0 {
            1.0
        } else {
            self.tn as f64 / (self.tn + self.fp) as f64
        }
    }
}

fn check_shape(name: &str, prediction: &MultiLabelOutput, truth: &[bool]) -> Result<(), MeasureError> {
    if prediction.num_labels() != truth.len() {
        return Err(MeasureError::Shape {
            measure: name.to_string(),
            predicted: prediction.num_labels(),
            truth: truth.len(),
        });
    }
    Ok(())
}

// --- Example-based ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleBased {
    HammingLoss,
    SubsetAccuracy,
    Precision,
    Recall,
    FMeasure,
    Accuracy,
    Specificity,
}

impl ExampleBased {
    fn name(&self) -> &'static str {
        match self {
            Self::HammingLoss => "Hamming Loss",
            Self::SubsetAccuracy => "Subset Accuracy",
            Self::Precision => "Example-Based Precision",
            Self::Recall => "Example-Based Recall",
            Self::FMeasure => "Example-Based F Measure",
            Self::Accuracy => "Example-Based Accuracy",
            Self::Specificity => "Example-Based Specificity",
        }
    }

    fn score(&self, c: &Confusion, labels: usize) -> f64 {
        match self {
            Self::HammingLoss => {
                if labels == 0 {
                    0.0
                } else {
                    (c.fp + c.fn_) as f64 / labels as f64
                }
            }
            Self::SubsetAccuracy => {
                if c.fp + c.fn_ == 0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Precision => c.precision(),
            Self::Recall => c.recall(),
            Self::FMeasure => c.f_measure(),
            Self::Accuracy => c.jaccard(),
            Self::Specificity => c.specificity(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExampleBasedMeasure {
    kind: ExampleBased,
    sum: f64,
    count: usize,
}

impl ExampleBasedMeasure {
    pub fn new(kind: ExampleBased) -> Self {
        Self {
            kind,
            sum: 0.0,
            count: 0,
        }
    }
}

impl Measure for ExampleBasedMeasure {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn ideal_value(&self) -> f64 {
        match self.kind {
            ExampleBased::HammingLoss => 0.0,
            _ => 1.0,
        }
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }

    fn update(&mut self, prediction: &MultiLabelOutput, truth: &[bool]) -> Result<(), MeasureError> {
        check_shape(self.name(), prediction, truth)?;
        let c = Confusion::of(prediction.bipartition(), truth);
        self.sum += self.kind.score(&c, truth.len());
        self.count += 1;
        Ok(())
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

// --- Micro-averaged ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicroAveraged {
    Precision,
    Recall,
    FMeasure,
}

#[derive(Debug, Clone)]
pub struct MicroMeasure {
    kind: MicroAveraged,
    num_labels: usize,
    pooled: Confusion,
    seen: usize,
}

impl MicroMeasure {
    pub fn new(kind: MicroAveraged, num_labels: usize) -> Self {
        Self {
            kind,
            num_labels,
            pooled: Confusion::default(),
            seen: 0,
        }
    }
}

impl Measure for MicroMeasure {
    fn name(&self) -> &str {
        match self.kind {
            MicroAveraged::Precision => "Micro-averaged Precision",
            MicroAveraged::Recall => "Micro-averaged Recall",
            MicroAveraged::FMeasure => "Micro-averaged F-Measure",
        }
    }

    fn ideal_value(&self) -> f64 {
        1.0
    }

    fn expected_labels(&self) -> Option<usize> {
        Some(self.num_labels)
    }

    fn reset(&mut self) {
        self.pooled = Confusion::default();
        self.seen = 0;
    }

    fn update(&mut self, prediction: &MultiLabelOutput, truth: &[bool]) -> Result<(), MeasureError> {
        if truth.len() != self.num_labels {
            return Err(MeasureError::LabelCount {
                measure: self.name().to_string(),
                expected: self.num_labels,
                actual: truth.len(),
            });
        }
        check_shape(self.name(), prediction, truth)?;
        self.pooled.add(Confusion::of(prediction.bipartition(), truth));
        self.seen += 1;
        Ok(())
    }

    fn value(&self) -> f64 {
        if self.seen == 0 {
            return f64::NAN;
        }
        match self.kind {
            MicroAveraged::Precision => self.pooled.precision(),
            MicroAveraged::Recall => self.pooled.recall(),
            MicroAveraged::FMeasure => self.pooled.f_measure(),
        }
    }
}

// --- Ranking-based ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingBased {
    AveragePrecision,
    Coverage,
    OneError,
    IsError,
    ErrorSetSize,
    RankingLoss,
}

impl RankingBased {
    fn name(&self) -> &'static str {
        match self {
            Self::AveragePrecision => "Average Precision",
            Self::Coverage => "Coverage",
            Self::OneError => "OneError",
            Self::IsError => "IsError",
            Self::ErrorSetSize => "ErrorSetSize",
            Self::RankingLoss => "Ranking Loss",
        }
    }

    /// Score one instance; `ranks[l]` is the 1-based rank of label `l`.
    /// Callers guarantee at least one relevant and one irrelevant label.
    fn score(&self, ranks: &[usize], truth: &[bool]) -> f64 {
        let relevant: Vec<usize> = (0..truth.len()).filter(|&l| truth[l]).collect();
        let irrelevant: Vec<usize> = (0..truth.len()).filter(|&l| !truth[l]).collect();
        let worst_relevant = relevant.iter().map(|&l| ranks[l]).max().unwrap_or(0);
        match self {
            Self::AveragePrecision => {
                let total: f64 = relevant
                    .iter()
                    .map(|&l| {
                        let above = relevant.iter().filter(|&&m| ranks[m] <= ranks[l]).count();
                        above as f64 / ranks[l] as f64
                    })
                    .sum();
                total / relevant.len() as f64
            }
            Self::Coverage => (worst_relevant - 1) as f64,
            Self::OneError => {
                let top = ranks.iter().position(|&r| r == 1);
                match top {
                    Some(l) if truth[l] => 0.0,
                    _ => 1.0,
                }
            }
            Self::IsError => {
                let misordered = irrelevant
                    .iter()
                    .any(|&i| relevant.iter().any(|&r| ranks[i] < ranks[r]));
                if misordered { 1.0 } else { 0.0 }
            }
            Self::ErrorSetSize => irrelevant
                .iter()
                .filter(|&&i| ranks[i] < worst_relevant)
                .count() as f64,
            Self::RankingLoss => {
                let misordered: usize = relevant
                    .iter()
                    .map(|&r| irrelevant.iter().filter(|&&i| ranks[i] < ranks[r]).count())
                    .sum();
                misordered as f64 / (relevant.len() * irrelevant.len()) as f64
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankingMeasure {
    kind: RankingBased,
    sum: f64,
    count: usize,
}

impl RankingMeasure {
    pub fn new(kind: RankingBased) -> Self {
        Self {
            kind,
            sum: 0.0,
            count: 0,
        }
    }
}

impl Measure for RankingMeasure {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn ideal_value(&self) -> f64 {
        match self.kind {
            RankingBased::AveragePrecision => 1.0,
            _ => 0.0,
        }
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }

    fn update(&mut self, prediction: &MultiLabelOutput, truth: &[bool]) -> Result<(), MeasureError> {
        check_shape(self.name(), prediction, truth)?;
        let relevant = truth.iter().filter(|&&t| t).count();
        if relevant == 0 || relevant == truth.len() {
            return Ok(());
        }
        self.sum += self.kind.score(prediction.ranking(), truth);
        self.count += 1;
        Ok(())
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}
