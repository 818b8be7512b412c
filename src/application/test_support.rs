// In-memory history source and catalog shared by service and handler tests
use crate::application::history_repository::HistoryRepository;
use crate::domain::catalog::IndicatorCatalog;
use crate::domain::history::{HistoryRow, RawCell};
use crate::domain::indicator::{Direction, IndicatorDefinition, UnitKind};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct InMemoryRepository {
    tables: HashMap<String, Vec<HistoryRow>>,
}

impl InMemoryRepository {
    pub(crate) fn with_table(mut self, source: &str, rows: Vec<HistoryRow>) -> Self {
        self.tables.insert(source.to_string(), rows);
        self
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn list_sources(&self) -> anyhow::Result<Vec<String>> {
        let mut sources: Vec<String> = self.tables.keys().cloned().collect();
        sources.sort();
        Ok(sources)
    }

    async fn load_rows(&self, source: &str) -> anyhow::Result<Vec<HistoryRow>> {
        self.tables
            .get(source)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("history table '{}' not found", source))
    }
}

fn row(week: &str, value_field: &str, value: f64, target: f64) -> HistoryRow {
    HistoryRow::new()
        .with("SEMANA", RawCell::parse(week))
        .with(value_field, RawCell::Number(value))
        .with("META", RawCell::Number(target))
}

pub(crate) fn sample_catalog() -> IndicatorCatalog {
    let mut realizacao = IndicatorDefinition::new(
        "rs",
        "Realização Semanal",
        "REALIZAÇÃO  SEMANAL",
        Direction::HigherIsBetter,
        UnitKind::Ratio,
    );
    realizacao.group = "Indicadores Contratuais".to_string();
    realizacao.source = "realizacao_semanal".to_string();

    let mut tempo = IndicatorDefinition::new(
        "tp",
        "Tempo de Planejamento",
        "TEMPO DE PLANEJAMENTO",
        Direction::LowerIsBetter,
        UnitKind::Duration,
    );
    tempo.group = "Indicadores Contratuais".to_string();
    tempo.source = "tempo_planejamento".to_string();

    let mut pfceo = IndicatorDefinition::new(
        "pfceo",
        "PFCEO",
        "EQUIPAMENTOS NO PAINEL",
        Direction::LowerIsBetter,
        UnitKind::Count,
    );
    pfceo.group = "Indicadores Cliente".to_string();
    pfceo.source = "pfceo".to_string();

    IndicatorCatalog::new(vec![realizacao, tempo, pfceo]).unwrap()
}

/// Histories for "rs" and "tp"; "pfceo" has no table
pub(crate) fn sample_repository() -> InMemoryRepository {
    InMemoryRepository::default()
        .with_table(
            "realizacao_semanal",
            vec![
                row("2024-S03", "REALIZAÇÃO  SEMANAL", 0.85, 0.90),
                row("2024-S01", "REALIZAÇÃO  SEMANAL", 0.95, 0.90),
                row("2024-S02", "REALIZAÇÃO  SEMANAL", 92.0, 0.90),
            ],
        )
        .with_table(
            "tempo_planejamento",
            vec![
                row("2024-S01", "TEMPO DE PLANEJAMENTO", 5.0, 4.0),
                row("2024-S02", "TEMPO DE PLANEJAMENTO", 3.0, 4.0),
            ],
        )
}
