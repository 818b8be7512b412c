// Projection overlay - sparse forward-looking series drawn next to the history
use super::extractor::HistoryRecord;
use super::indicator::UnitKind;
use super::series::NO_VALUE;

/// One slot per record; absent projections stay NO_VALUE. Readings are
/// rescaled only when the projection shares the primary value's unit.
pub fn projection_overlay(records: &[&HistoryRecord], projection_unit: UnitKind, value_unit: UnitKind) -> Vec<Option<f64>> {
    records
        .iter()
        .map(|record| match record.projection {
            Some(raw) if projection_unit == value_unit => Some(value_unit.normalize(raw)),
            Some(raw) => Some(raw),
            None => NO_VALUE,
        })
        .collect()
}

/// True when at least one period carries a projection
pub fn has_projection(overlay: &[Option<f64>]) -> bool {
    overlay.iter().any(Option::is_some)
}
