// Indicator extractor - orders a history and selects the latest complete reading
use super::error::KpiError;
use super::history::{HistoryRow, OrderKey};
use super::indicator::FieldMapping;
use serde::Serialize;
use std::cmp::Ordering;

/// One period of an indicator, read through its field mapping. Values are raw (not normalized).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub period: String,
    pub value: Option<f64>,
    pub target: Option<f64>,
    pub projection: Option<f64>,
    pub note: Option<String>,
}

impl HistoryRecord {
    /// Malformed numeric cells are absorbed as missing
    pub fn from_row(row: &HistoryRow, fields: &FieldMapping) -> Self {
        let period = period_label(row, fields);
        let value = read_number(row, &fields.value, &period);
        let target = read_number(row, &fields.target, &period);
        let projection = read_number(row, &fields.projection, &period);

        Self {
            value,
            target,
            projection,
            note: row.text(&fields.note),
            period,
        }
    }

    pub fn complete_pair(&self) -> Option<(f64, f64)> {
        self.value.zip(self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestReading {
    pub period: String,
    pub value: f64,
    pub target: f64,
    pub note: Option<String>,
}

fn period_label(row: &HistoryRow, fields: &FieldMapping) -> String {
    if let Some(format) = fields.period_label_format.as_deref() {
        if let Some(key @ OrderKey::Date(_)) = row.order_key(&fields.period) {
            return key.label(Some(format));
        }
        if let Some(key @ OrderKey::Date(_)) = row.order_key(&fields.order) {
            return key.label(Some(format));
        }
    }
    row.order_key(&fields.period)
        .map(|key| key.label(None))
        .unwrap_or_default()
}

fn read_number(row: &HistoryRow, field: &str, period: &str) -> Option<f64> {
    match row.number(field) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(period, "treating cell as missing: {}", e);
            None
        }
    }
}

/// Records in ascending period order. The sort is stable; rows without an
/// order key keep their relative order after every keyed row.
pub fn ordered_records(rows: &[HistoryRow], fields: &FieldMapping) -> Vec<HistoryRecord> {
    let mut keyed: Vec<(Option<OrderKey>, HistoryRecord)> = rows
        .iter()
        .map(|row| (row.order_key(&fields.order), HistoryRecord::from_row(row, fields)))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Last complete reading among already ordered records
pub fn latest_complete(records: &[HistoryRecord]) -> Result<LatestReading, KpiError> {
    records
        .iter()
        .filter_map(|record| record.complete_pair().map(|pair| (record, pair)))
        .last()
        .map(|(record, (value, target))| LatestReading {
            period: record.period.clone(),
            value,
            target,
            note: record.note.clone(),
        })
        .ok_or(KpiError::NotAvailable)
}

/// Drop rows lacking a value or target, then take the chronologically last one
pub fn extract_latest(rows: &[HistoryRow], fields: &FieldMapping) -> Result<LatestReading, KpiError> {
    latest_complete(&ordered_records(rows, fields))
}
