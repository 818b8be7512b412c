// Series segmenter - splits a series into two threshold-capped masked series
use super::error::KpiError;
use super::indicator::Direction;
use serde::Serialize;

/// "Draw nothing here" marker; serialized as null, never zero
pub const NO_VALUE: Option<f64> = None;

/// Target a series is compared against
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Threshold {
    Scalar(f64),
    PerPeriod(Vec<f64>),
}

impl Threshold {
    fn at(&self, index: usize) -> f64 {
        match self {
            Threshold::Scalar(target) => *target,
            Threshold::PerPeriod(targets) => targets[index],
        }
    }
}

/// For every index one side holds the true value and the other holds the
/// threshold (compliant side) or NO_VALUE (non-compliant side).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentedSeries {
    pub compliant_masked: Vec<f64>,
    pub non_compliant_masked: Vec<Option<f64>>,
}

impl SegmentedSeries {
    pub fn len(&self) -> usize {
        self.compliant_masked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compliant_masked.is_empty()
    }
}

pub fn segment(series: &[f64], threshold: &Threshold, direction: Direction) -> Result<SegmentedSeries, KpiError> {
    if let Threshold::PerPeriod(targets) = threshold {
        if targets.len() != series.len() {
            return Err(KpiError::SeriesLengthMismatch {
                values: series.len(),
                targets: targets.len(),
            });
        }
    }

    let mut compliant_masked = Vec::with_capacity(series.len());
    let mut non_compliant_masked = Vec::with_capacity(series.len());

    for (index, &value) in series.iter().enumerate() {
        let target = threshold.at(index);
        if direction.meets_target(value, target) {
            compliant_masked.push(value);
            non_compliant_masked.push(NO_VALUE);
        } else {
            compliant_masked.push(target);
            non_compliant_masked.push(Some(value));
        }
    }

    Ok(SegmentedSeries {
        compliant_masked,
        non_compliant_masked,
    })
}
