// KPI card domain model - single-period verdict handed to the renderer
use super::evaluation::{evaluate_reading, Status};
use super::extractor::{latest_complete, HistoryRecord};
use super::indicator::{Direction, IndicatorDefinition};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub indicator_id: String,
    pub name: String,
    pub direction: Direction,
    pub unit_suffix: String,
    #[serde(flatten)]
    pub state: CardState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CardState {
    Evaluated(CardReading),
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReading {
    pub period: String,
    pub value: f64,
    pub target: f64,
    pub formatted_value: String,
    pub formatted_target: String,
    pub meets_target: bool,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl KpiCard {
    pub fn no_data(definition: &IndicatorDefinition) -> Self {
        Self::with_state(definition, CardState::NoData)
    }

    /// Card for the latest complete record; no complete record renders as "no data"
    pub fn from_records(definition: &IndicatorDefinition, records: &[HistoryRecord]) -> Self {
        match latest_complete(records) {
            Ok(reading) => {
                let point = evaluate_reading(&reading, definition.unit, definition.direction);
                let state = CardState::Evaluated(CardReading {
                    formatted_value: definition.format_value(point.value),
                    formatted_target: definition.format_value(point.target),
                    period: reading.period,
                    value: point.value,
                    target: point.target,
                    meets_target: point.meets_target,
                    status: point.status(),
                    note: reading.note,
                });
                Self::with_state(definition, state)
            }
            Err(_) => Self::no_data(definition),
        }
    }

    pub fn reading(&self) -> Option<&CardReading> {
        match &self.state {
            CardState::Evaluated(reading) => Some(reading),
            CardState::NoData => None,
        }
    }

    fn with_state(definition: &IndicatorDefinition, state: CardState) -> Self {
        Self {
            indicator_id: definition.id.clone(),
            name: definition.name.clone(),
            direction: definition.direction,
            unit_suffix: definition.unit_suffix.clone(),
            state,
        }
    }
}
