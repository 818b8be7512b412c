// Indicator service - Use cases for the overview dashboard and indicator detail
use crate::application::history_repository::HistoryRepository;
use crate::domain::card::KpiCard;
use crate::domain::catalog::IndicatorCatalog;
use crate::domain::dashboard::{CardGroup, Dashboard, IndicatorDetail};
use crate::domain::extractor::ordered_records;
use crate::domain::indicator::IndicatorDefinition;
use anyhow::Context;
use std::sync::Arc;

pub const DASHBOARD_TITLE: &str = "Indicadores Consolidados";

#[derive(Clone)]
pub struct IndicatorService {
    repository: Arc<dyn HistoryRepository>,
    catalog: Arc<IndicatorCatalog>,
}

impl IndicatorService {
    pub fn new(repository: Arc<dyn HistoryRepository>, catalog: Arc<IndicatorCatalog>) -> Self {
        Self { repository, catalog }
    }

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    /// Every indicator's card, grouped. Indicators whose history cannot be
    /// loaded render as "no data" instead of failing the whole page.
    pub async fn get_dashboard(&self) -> Dashboard {
        let mut groups = Vec::new();

        for (title, definitions) in self.catalog.groups() {
            let mut cards = Vec::with_capacity(definitions.len());
            for definition in &definitions {
                cards.push(load_card(self.repository.as_ref(), definition).await);
            }
            groups.push(CardGroup { title, cards });
        }

        Dashboard::new(DASHBOARD_TITLE.to_string(), groups)
    }

    /// `Ok(None)` when the id is not in the catalog
    pub async fn get_indicator(&self, id: &str) -> anyhow::Result<Option<IndicatorDetail>> {
        let Some(definition) = self.catalog.get(id) else {
            return Ok(None);
        };

        let rows = self
            .repository
            .load_rows(&definition.source)
            .await
            .with_context(|| format!("Failed to load history for indicator {}", definition.id))?;

        tracing::debug!("Evaluating {} over {} rows", definition.id, rows.len());
        Ok(Some(IndicatorDetail::evaluate(&definition, &rows)))
    }
}

/// Load one indicator's history and evaluate its card
pub async fn load_card(repository: &dyn HistoryRepository, definition: &IndicatorDefinition) -> KpiCard {
    match repository.load_rows(&definition.source).await {
        Ok(rows) => {
            let records = ordered_records(&rows, &definition.fields);
            KpiCard::from_records(definition, &records)
        }
        Err(e) => {
            tracing::warn!("Error loading history for {}: {:#}", definition.id, e);
            KpiCard::no_data(definition)
        }
    }
}
