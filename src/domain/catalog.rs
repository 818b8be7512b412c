// Indicator catalog - the validated set of definitions loaded once at startup
use super::error::KpiError;
use super::indicator::IndicatorDefinition;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct IndicatorCatalog {
    indicators: Vec<Arc<IndicatorDefinition>>,
}

impl IndicatorCatalog {
    pub fn new(definitions: Vec<IndicatorDefinition>) -> Result<Self, KpiError> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if definition.id.trim().is_empty() {
                return Err(KpiError::configuration(&definition.name, "indicator id is empty"));
            }
            if !seen.insert(definition.id.clone()) {
                return Err(KpiError::configuration(&definition.id, "duplicate indicator id"));
            }
        }

        Ok(Self {
            indicators: definitions.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn get(&self, id: &str) -> Option<Arc<IndicatorDefinition>> {
        self.indicators.iter().find(|d| d.id == id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<IndicatorDefinition>> {
        self.indicators.iter()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Group titles in first-seen order, each with its indicators in declaration order
    pub fn groups(&self) -> Vec<(String, Vec<Arc<IndicatorDefinition>>)> {
        let mut groups: Vec<(String, Vec<Arc<IndicatorDefinition>>)> = Vec::new();
        for definition in &self.indicators {
            match groups.iter_mut().find(|(title, _)| *title == definition.group) {
                Some((_, members)) => members.push(definition.clone()),
                None => groups.push((definition.group.clone(), vec![definition.clone()])),
            }
        }
        groups
    }
}
