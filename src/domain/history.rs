// History row domain model - one reporting period as read from a source table
use super::error::KpiError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Source headers are matched trimmed and case-insensitively.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Number(f64),
    Text(String),
    Empty,
}

impl RawCell {
    /// Classify a cell read from a text source
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return RawCell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => RawCell::Number(value),
            // spreadsheet exports write missing numbers as NaN
            Ok(_) => RawCell::Empty,
            Err(_) => RawCell::Text(trimmed.to_string()),
        }
    }

    /// Coerce the cell to a number. Blank cells and NaN are missing, not malformed.
    pub fn as_number(&self, field: &str) -> Result<Option<f64>, KpiError> {
        match self {
            RawCell::Number(value) if value.is_finite() => Ok(Some(*value)),
            RawCell::Number(_) | RawCell::Empty => Ok(None),
            RawCell::Text(text) if text.trim().is_empty() => Ok(None),
            RawCell::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Some(value)),
                _ => Err(KpiError::MalformedRecord {
                    field: field.to_string(),
                    raw: text.clone(),
                }),
            },
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            RawCell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                Some(format!("{}", *value as i64))
            }
            RawCell::Number(value) => Some(value.to_string()),
            RawCell::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawCell::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryRow {
    cells: HashMap<String, RawCell>,
}

impl HistoryRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, cell: RawCell) {
        self.cells.insert(normalize_header(field), cell);
    }

    pub fn with(mut self, field: &str, cell: RawCell) -> Self {
        self.insert(field, cell);
        self
    }

    pub fn get(&self, field: &str) -> Option<&RawCell> {
        self.cells.get(&normalize_header(field))
    }

    /// Numeric view of a field; an absent column reads as missing
    pub fn number(&self, field: &str) -> Result<Option<f64>, KpiError> {
        match self.get(field) {
            Some(cell) => cell.as_number(field),
            None => Ok(None),
        }
    }

    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(RawCell::as_text)
    }

    pub fn order_key(&self, field: &str) -> Option<OrderKey> {
        self.get(field).and_then(OrderKey::from_cell)
    }
}

/// Sort key for a period. Dates order chronologically, numbers numerically, text lexically.
#[derive(Debug, Clone)]
pub enum OrderKey {
    Date(NaiveDateTime),
    Number(f64),
    Text(String),
}

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

impl OrderKey {
    pub fn from_cell(cell: &RawCell) -> Option<Self> {
        match cell {
            RawCell::Number(value) if value.is_finite() => Some(OrderKey::Number(*value)),
            RawCell::Number(_) | RawCell::Empty => None,
            RawCell::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                Some(
                    parse_date(trimmed)
                        .map(OrderKey::Date)
                        .unwrap_or_else(|| OrderKey::Text(trimmed.to_string())),
                )
            }
        }
    }

    /// Date keys honour `format` when given; everything else renders as-is
    pub fn label(&self, format: Option<&str>) -> String {
        match (self, format) {
            (OrderKey::Date(date), Some(format)) => date.format(format).to_string(),
            (OrderKey::Date(date), None) if date.time() == NaiveTime::MIN => {
                date.date().format("%Y-%m-%d").to_string()
            }
            (OrderKey::Date(date), None) => date.format("%Y-%m-%d %H:%M:%S").to_string(),
            (OrderKey::Number(value), _) => RawCell::Number(*value).as_text().unwrap_or_default(),
            (OrderKey::Text(text), _) => text.clone(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            OrderKey::Date(_) => 0,
            OrderKey::Number(_) => 1,
            OrderKey::Text(_) => 2,
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OrderKey::Date(a), OrderKey::Date(b)) => a.cmp(b),
            (OrderKey::Number(a), OrderKey::Number(b)) => a.total_cmp(b),
            (OrderKey::Text(a), OrderKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}
