// Chart domain model - segmented history ready for a two-tone area or bar fill
use super::error::KpiError;
use super::extractor::{latest_complete, HistoryRecord};
use super::indicator::{ChartKind, Direction, IndicatorDefinition, TargetMode};
use super::projection::{has_projection, projection_overlay};
use super::series::{segment, SegmentedSeries, Threshold};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub indicator_id: String,
    pub title: String,
    pub kind: ChartKind,
    pub direction: Direction,
    pub period_labels: Vec<String>,
    /// Normalized values, drawn as the line over both fills
    pub values: Vec<f64>,
    #[serde(flatten)]
    pub segmented: SegmentedSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Vec<Option<f64>>>,
    pub target_line: Threshold,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub unit_suffix: String,
    pub display_scale: f64,
    pub fraction_digits: usize,
}

impl ChartData {
    /// Build from ordered records. Rows without a value are not plotted; the
    /// threshold comes from the latest complete record, so a history without
    /// one has no chart.
    pub fn from_records(definition: &IndicatorDefinition, records: &[HistoryRecord]) -> Result<Self, KpiError> {
        let unit = definition.unit;
        let latest = latest_complete(records)?;
        let latest_target = unit.normalize(latest.target);

        let plotted: Vec<&HistoryRecord> = records.iter().filter(|r| r.value.is_some()).collect();
        let values: Vec<f64> = plotted
            .iter()
            .filter_map(|r| r.value)
            .map(|v| unit.normalize(v))
            .collect();

        let target_line = match definition.target_mode {
            TargetMode::Scalar => Threshold::Scalar(latest_target),
            TargetMode::PerPeriod => Threshold::PerPeriod(
                plotted
                    .iter()
                    .map(|r| r.target.map(|t| unit.normalize(t)).unwrap_or(latest_target))
                    .collect(),
            ),
        };

        let segmented = segment(&values, &target_line, definition.direction)?;
        let (y_min, y_max) = axis_bounds(definition, &values, &target_line);
        let overlay = projection_overlay(&plotted, definition.projection_unit, unit);

        Ok(Self {
            indicator_id: definition.id.clone(),
            title: definition.name.clone(),
            kind: definition.chart.kind,
            direction: definition.direction,
            period_labels: plotted.iter().map(|r| r.period.clone()).collect(),
            values,
            segmented,
            projection: has_projection(&overlay).then_some(overlay),
            target_line,
            y_min,
            y_max,
            unit_suffix: definition.unit_suffix.clone(),
            display_scale: unit.display_scale(),
            fraction_digits: definition.precision,
        })
    }
}

/// Configured bounds win. With padding, a missing bound is taken from the
/// plotted values and targets in display units; the lower one stops at zero.
fn axis_bounds(definition: &IndicatorDefinition, values: &[f64], target_line: &Threshold) -> (Option<f64>, Option<f64>) {
    let chart = &definition.chart;
    let Some(padding) = chart.y_padding else {
        return (chart.y_min, chart.y_max);
    };

    let targets = match target_line {
        Threshold::Scalar(target) => std::slice::from_ref(target),
        Threshold::PerPeriod(targets) => targets.as_slice(),
    };
    let scale = definition.unit.display_scale();
    let shown = values.iter().chain(targets).map(|v| v * scale);
    let low = shown.clone().fold(f64::INFINITY, f64::min);
    let high = shown.fold(f64::NEG_INFINITY, f64::max);

    (
        chart.y_min.or(Some((low - padding).max(0.0))),
        chart.y_max.or(Some(high + padding)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::UnitKind;
    use crate::domain::series::NO_VALUE;

    fn record(period: &str, value: Option<f64>, target: Option<f64>, projection: Option<f64>) -> HistoryRecord {
        HistoryRecord {
            period: period.to_string(),
            value,
            target,
            projection,
            note: None,
        }
    }

    fn realizacao() -> IndicatorDefinition {
        IndicatorDefinition::new("rs", "Realização Semanal", "REALIZAÇÃO  SEMANAL", Direction::HigherIsBetter, UnitKind::Ratio)
    }

    #[test]
    fn test_ratio_chart_scenario() {
        let records = vec![
            record("S01", Some(0.95), Some(0.90), None),
            record("S02", Some(0.80), Some(0.90), None),
        ];

        let chart = ChartData::from_records(&realizacao(), &records).unwrap();
        assert_eq!(chart.period_labels, vec!["S01", "S02"]);
        assert_eq!(chart.segmented.compliant_masked, vec![0.95, 0.90]);
        assert_eq!(chart.segmented.non_compliant_masked, vec![NO_VALUE, Some(0.80)]);
        assert_eq!(chart.target_line, Threshold::Scalar(0.90));
        assert_eq!(chart.display_scale, 100.0);
        assert!(chart.projection.is_none());
    }

    #[test]
    fn test_percentage_point_history_is_rescaled() {
        let records = vec![
            record("S01", Some(95.0), Some(90.0), Some(12.0)),
            record("S02", Some(0.85), Some(0.90), None),
        ];

        let chart = ChartData::from_records(&realizacao(), &records).unwrap();
        assert_eq!(chart.values, vec![0.95, 0.85]);
        assert_eq!(chart.segmented.compliant_masked, vec![0.95, 0.90]);
        assert_eq!(chart.projection, Some(vec![Some(0.12), NO_VALUE]));
    }

    #[test]
    fn test_rows_without_value_are_not_plotted() {
        let records = vec![
            record("S01", Some(5.0), Some(4.0), None),
            record("S02", None, Some(4.0), Some(6.0)),
            record("S03", Some(3.0), Some(4.0), None),
        ];
        let definition = IndicatorDefinition::new("vz", "Vazamentos", "VAZAMENTOS TOTAIS", Direction::LowerIsBetter, UnitKind::Count);

        let chart = ChartData::from_records(&definition, &records).unwrap();
        assert_eq!(chart.period_labels, vec!["S01", "S03"]);
        assert_eq!(chart.segmented.len(), 2);
        assert_eq!(chart.segmented.compliant_masked, vec![4.0, 3.0]);
    }

    #[test]
    fn test_per_period_targets_fall_back_to_latest() {
        let mut definition = realizacao();
        definition.target_mode = TargetMode::PerPeriod;
        let records = vec![
            record("S01", Some(0.88), Some(0.85), None),
            record("S02", Some(0.88), None, None),
            record("S03", Some(0.88), Some(0.90), None),
        ];

        let chart = ChartData::from_records(&definition, &records).unwrap();
        assert_eq!(chart.target_line, Threshold::PerPeriod(vec![0.85, 0.90, 0.90]));
        assert_eq!(chart.segmented.non_compliant_masked, vec![NO_VALUE, Some(0.88), Some(0.88)]);
    }

    #[test]
    fn test_padded_axis_follows_data() {
        let mut definition = IndicatorDefinition::new("pfceo", "PFCEO", "EQUIPAMENTOS NO PAINEL", Direction::LowerIsBetter, UnitKind::Count);
        definition.chart.y_padding = Some(2.0);
        let records = vec![
            record("S01", Some(1.0), Some(5.0), None),
            record("S02", Some(7.0), Some(5.0), None),
        ];

        let chart = ChartData::from_records(&definition, &records).unwrap();
        assert_eq!(chart.y_min, Some(0.0));
        assert_eq!(chart.y_max, Some(9.0));

        definition.chart.y_max = Some(20.0);
        let chart = ChartData::from_records(&definition, &records).unwrap();
        assert_eq!(chart.y_max, Some(20.0));
    }

    #[test]
    fn test_unpadded_axis_uses_configured_bounds() {
        let mut definition = realizacao();
        definition.chart.y_min = Some(70.0);
        let chart = ChartData::from_records(&definition, &[record("S01", Some(0.95), Some(0.90), None)]).unwrap();
        assert_eq!(chart.y_min, Some(70.0));
        assert_eq!(chart.y_max, None);
    }

    #[test]
    fn test_no_complete_record_means_no_chart() {
        let records = vec![record("S01", Some(0.9), None, None)];
        assert_eq!(
            ChartData::from_records(&realizacao(), &records),
            Err(KpiError::NotAvailable)
        );
    }
}
