// Dashboard domain model
use super::card::KpiCard;
use super::chart::ChartData;
use super::extractor::ordered_records;
use super::history::HistoryRow;
use super::indicator::IndicatorDefinition;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardGroup {
    pub title: String,
    pub cards: Vec<KpiCard>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub groups: Vec<CardGroup>,
}

impl Dashboard {
    pub fn new(title: String, groups: Vec<CardGroup>) -> Self {
        Self { title, groups }
    }
}

/// Card plus chart for one indicator
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorDetail {
    pub card: KpiCard,
    pub chart: Option<ChartData>,
}

impl IndicatorDetail {
    pub fn evaluate(definition: &IndicatorDefinition, rows: &[HistoryRow]) -> Self {
        let records = ordered_records(rows, &definition.fields);
        Self {
            card: KpiCard::from_records(definition, &records),
            chart: ChartData::from_records(definition, &records).ok(),
        }
    }

    pub fn no_data(definition: &IndicatorDefinition) -> Self {
        Self {
            card: KpiCard::no_data(definition),
            chart: None,
        }
    }
}
