//! Brute-force nearest neighbour search over mixed numeric/nominal attributes.
//!
//! Numeric attributes are min-max normalised by the training range; nominal
//! attributes contribute 0 when equal and 1 otherwise. Missing values (`NaN`)
//! take the largest plausible difference.

use crate::data::{Attribute, AttributeKind};

/// How one column contributes to the distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnScale {
    Numeric { min: f64, width: f64 },
    Nominal,
}

impl ColumnScale {
    fn normalise(&self, value: f64) -> f64 {
        match *self {
            ColumnScale::Numeric { min, width } if width > 0.0 => (value - min) / width,
            _ => 0.0,
        }
    }

    fn difference(&self, a: f64, b: f64) -> f64 {
        match self {
            ColumnScale::Nominal => {
                if a.is_nan() || b.is_nan() || a != b {
                    1.0
                } else {
                    0.0
                }
            }
            ColumnScale::Numeric { .. } => match (a.is_nan(), b.is_nan()) {
                (true, true) => 1.0,
                (true, false) => far_side(self.normalise(b)),
                (false, true) => far_side(self.normalise(a)),
                (false, false) => self.normalise(a) - self.normalise(b),
            },
        }
    }
}

fn far_side(norm: f64) -> f64 {
    if norm < 0.5 { 1.0 - norm } else { norm }
}

/// Column kinds for a feature schema, before ranges are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Nominal,
}

impl From<&Attribute> for ColumnKind {
    fn from(attr: &Attribute) -> Self {
        match attr.kind {
            AttributeKind::Numeric => ColumnKind::Numeric,
            AttributeKind::Nominal { .. } => ColumnKind::Nominal,
        }
    }
}

pub fn column_kinds(attributes: &[Attribute]) -> Vec<ColumnKind> {
    attributes.iter().map(ColumnKind::from).collect()
}

/// Training points plus the per-column scaling derived from them.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    scales: Vec<ColumnScale>,
    points: Vec<Vec<f64>>,
}

impl NeighborIndex {
    pub fn build(kinds: &[ColumnKind], points: Vec<Vec<f64>>) -> Self {
        let scales = kinds
            .iter()
            .enumerate()
            .map(|(col, kind)| match kind {
                ColumnKind::Nominal => ColumnScale::Nominal,
                ColumnKind::Numeric => {
                    let mut min = f64::INFINITY;
                    let mut max = f64::NEG_INFINITY;
                    for v in points.iter().map(|p| p[col]).filter(|v| !v.is_nan()) {
                        min = min.min(v);
                        max = max.max(v);
                    }
                    if min.is_finite() && max.is_finite() {
                        ColumnScale::Numeric {
                            min,
                            width: max - min,
                        }
                    } else {
                        ColumnScale::Numeric {
                            min: 0.0,
                            width: 0.0,
                        }
                    }
                }
            })
            .collect();
        Self { scales, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.scales.len()
    }

    pub fn squared_distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self.scales
            .iter()
            .zip(a.iter().zip(b))
            .map(|(scale, (&x, &y))| {
                let d = scale.difference(x, y);
                d * d
            })
            .sum()
    }

    /// Indices of the `k` nearest training points, closest first. Ties go to
    /// the lower index. `exclude` drops one point (leave-one-out).
    pub fn nearest(&self, query: &[f64], k: usize, exclude: Option<usize>) -> Vec<usize> {
        let mut scored: Vec<(f64, usize)> = self
            .points
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exclude)
            .map(|(i, p)| (self.squared_distance(query, p), i))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        scored.into_iter().take(k).map(|(_, i)| i).collect()
    }
}
