// Threshold evaluator - direction-aware verdict for a single period
use super::extractor::LatestReading;
use super::indicator::{Direction, UnitKind};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Compliant,
    NonCompliant,
}

impl From<bool> for Status {
    fn from(meets_target: bool) -> Self {
        if meets_target {
            Status::Compliant
        } else {
            Status::NonCompliant
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Compliant => write!(f, "compliant"),
            Status::NonCompliant => write!(f, "non-compliant"),
        }
    }
}

/// A reading with value and target on the same scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedPoint {
    pub value: f64,
    pub target: f64,
    pub meets_target: bool,
}

impl EvaluatedPoint {
    pub fn status(&self) -> Status {
        Status::from(self.meets_target)
    }
}

pub fn evaluate(value: f64, target: f64, direction: Direction) -> bool {
    direction.meets_target(value, target)
}

/// Normalize value and target independently, then compare
pub fn evaluate_raw(raw_value: f64, raw_target: f64, unit: UnitKind, direction: Direction) -> EvaluatedPoint {
    let value = unit.normalize(raw_value);
    let target = unit.normalize(raw_target);
    EvaluatedPoint {
        value,
        target,
        meets_target: evaluate(value, target, direction),
    }
}

pub fn evaluate_reading(reading: &LatestReading, unit: UnitKind, direction: Direction) -> EvaluatedPoint {
    evaluate_raw(reading.value, reading.target, unit, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_points_value_against_ratio_target() {
        let point = evaluate_raw(92.0, 0.90, UnitKind::Ratio, Direction::HigherIsBetter);
        assert_eq!(point.value, 0.92);
        assert_eq!(point.target, 0.90);
        assert!(point.meets_target);
        assert_eq!(point.status(), Status::Compliant);
    }

    #[test]
    fn test_both_sides_rescaled() {
        let point = evaluate_raw(85.0, 90.0, UnitKind::Ratio, Direction::HigherIsBetter);
        assert_eq!(point.value, 0.85);
        assert_eq!(point.target, 0.90);
        assert!(!point.meets_target);
    }

    #[test]
    fn test_durations_are_not_rescaled() {
        let point = evaluate_raw(12.0, 10.0, UnitKind::Duration, Direction::LowerIsBetter);
        assert_eq!(point.value, 12.0);
        assert!(!point.meets_target);
        assert_eq!(point.status(), Status::NonCompliant);
    }

    #[test]
    fn test_equality_is_compliant_both_ways() {
        for value in [0.0, 0.5, 0.9, 3.0, 250.0] {
            assert!(evaluate(value, value, Direction::HigherIsBetter));
            assert!(evaluate(value, value, Direction::LowerIsBetter));
        }
    }

    #[test]
    fn test_latest_reading_scenario() {
        let reading = LatestReading {
            period: "S02".to_string(),
            value: 0.80,
            target: 0.90,
            note: None,
        };
        let point = evaluate_reading(&reading, UnitKind::Ratio, Direction::HigherIsBetter);
        assert!(!point.meets_target);
    }
}
